//! Request bodies accepted by the JSON routes.
//!
//! Clients are loose about types: ids arrive as numbers, numeric strings,
//! `null` or `""`, and "empty" values (`0`, `""`, `{}`) mean "not given".
//! The helpers here fold that looseness into plain Rust types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::db::NewQuestion;

/// Deserialize an id that may be a JSON number, a numeric string, or empty.
fn deserialize_optional_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    struct Vis;
    impl<'de> serde::de::Visitor<'de> for Vis {
        type Value = Option<i64>;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("number, numeric string or null")
        }
        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }
        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map(Some).map_err(E::custom)
        }
        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            integral(v)
                .map(Some)
                .ok_or_else(|| E::custom(format!("{v} is not a whole number")))
        }
        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse().map(Some).map_err(E::custom)
        }
        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }
    d.deserialize_any(Vis)
}

/// `1.0` names the same id as `1`.
fn integral(v: f64) -> Option<i64> {
    let in_range = v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64;
    in_range.then_some(v as i64)
}

/// Keeps an explicit `null` distinguishable from a missing key.
fn deserialize_present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

/// Mirrors JSON "emptiness": `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Body of `POST /questions`.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionsBody {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category: Option<i64>,
    #[serde(default)]
    pub search: Option<Value>,
    #[serde(default)]
    pub question: Option<Value>,
}

/// What a `POST /questions` body asks for, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionsRequest {
    ByCategory(i64),
    Search(String),
    Create(Value),
}

impl QuestionsBody {
    /// `None` when no branch applies.
    pub fn into_request(self) -> Option<QuestionsRequest> {
        if let Some(category_id) = self.category.filter(|id| *id != 0) {
            return Some(QuestionsRequest::ByCategory(category_id));
        }
        if let Some(term) = self.search.as_ref().and_then(search_term) {
            return Some(QuestionsRequest::Search(term));
        }
        self.question
            .filter(is_truthy)
            .map(QuestionsRequest::Create)
    }
}

/// Search terms may be strings or numbers; empty strings and zero mean "no search".
fn search_term(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The nested `question` object of a create request. Every field is required.
#[derive(Debug, Default, Deserialize)]
pub struct NewQuestionBody {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub difficulty: Option<i64>,
}

impl NewQuestionBody {
    pub fn into_new_question(self) -> Option<NewQuestion> {
        Some(NewQuestion {
            question: self.question?,
            answer: self.answer?,
            category: self.category?,
            difficulty: self.difficulty?,
        })
    }
}

/// Parses the `question` value of a create request; `None` if anything is missing or mistyped.
pub fn parse_new_question(value: Value) -> Option<NewQuestion> {
    serde_json::from_value::<NewQuestionBody>(value)
        .ok()?
        .into_new_question()
}

/// Body of `POST /quizzes`.
#[derive(Debug, Default, Deserialize)]
pub struct QuizBody {
    #[serde(default)]
    pub quiz: Option<QuizState>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuizState {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub category_id: Option<Value>,
    #[serde(default)]
    pub previous_questions: Option<Vec<i64>>,
}

/// Which questions a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope {
    All,
    Only(i64),
}

impl QuizState {
    /// `None` if `category_id` is missing or is not a usable id.
    pub fn scope(&self) -> Option<CategoryScope> {
        let value = self.category_id.as_ref()?;
        if !is_truthy(value) || value.as_str().is_some_and(|s| s.trim() == "0") {
            return Some(CategoryScope::All);
        }
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(integral))
                .map(CategoryScope::Only),
            Value::String(s) => s.trim().parse().ok().map(CategoryScope::Only),
            _ => None,
        }
    }
}

use axum::{extract::State, routing::post, Json, Router};
use rand::{seq::SliceRandom, Rng};
use serde::{Serialize, Serializer};

use crate::{
    db::{Category, Question},
    extractors::JsonBody,
    models::{CategoryScope, QuizBody},
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::QUIZZES_URL, post(next_quiz_question))
}

/// The category a quiz is played in; rendered as `""` when playing all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentCategory {
    All,
    Category(Category),
}

impl Serialize for CurrentCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CurrentCategory::All => serializer.serialize_str(""),
            CurrentCategory::Category(category) => category.serialize(serializer),
        }
    }
}

#[derive(Serialize)]
struct QuizTurn {
    success: bool,
    question: Option<Question>,
    previous_questions: Vec<i64>,
    current_category: CurrentCategory,
}

/// Chooses the next quiz question.
///
/// Only the first [`names::QUIZ_WINDOW`] candidates are considered. Those
/// already asked are dropped and one of the rest is drawn uniformly. `None`
/// means the window is exhausted.
pub fn pick_question<R: Rng + ?Sized>(
    candidates: &[Question],
    previous: &[i64],
    rng: &mut R,
) -> Option<Question> {
    let eligible: Vec<&Question> = candidates
        .iter()
        .take(names::QUIZ_WINDOW)
        .filter(|question| !previous.contains(&question.id))
        .collect();

    eligible.choose(rng).copied().cloned()
}

async fn next_quiz_question(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<QuizBody>,
) -> Result<Json<QuizTurn>, AppError> {
    let quiz = body.quiz.ok_or(AppError::Unprocessable)?;
    let scope = quiz.scope().ok_or(AppError::Unprocessable)?;
    let previous_questions = quiz.previous_questions.ok_or(AppError::Unprocessable)?;

    let (candidates, current_category) = match scope {
        CategoryScope::All => {
            let questions = state
                .db
                .questions()
                .await
                .reject("could not list questions")?;
            (questions, CurrentCategory::All)
        }
        CategoryScope::Only(category_id) => {
            let category = state
                .db
                .category(category_id)
                .await
                .reject("could not get category")?
                .ok_or(AppError::NotFound)?;
            let questions = state
                .db
                .questions_by_category(category.id)
                .await
                .reject("could not filter questions by category")?;
            (questions, CurrentCategory::Category(category))
        }
    };

    let question = {
        let mut rng = state.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pick_question(&candidates, &previous_questions, &mut *rng)
    };

    tracing::debug!(
        "quiz turn: scope={scope:?}, previous={previous_questions:?}, picked={:?}",
        question.as_ref().map(|q| q.id)
    );

    Ok(Json(QuizTurn {
        success: true,
        question,
        previous_questions,
        current_category,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn questions(ids: impl IntoIterator<Item = i64>) -> Vec<Question> {
        ids.into_iter()
            .map(|id| Question {
                id,
                question: format!("Question {id}"),
                answer: format!("Answer {id}"),
                category: 1,
                difficulty: 1,
            })
            .collect()
    }

    #[test]
    fn never_returns_a_previous_question() {
        let candidates = questions(1..=5);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let picked = pick_question(&candidates, &[1, 3, 5], &mut rng).unwrap();
            assert!([2, 4].contains(&picked.id), "picked {}", picked.id);
        }
    }

    #[test]
    fn only_the_first_five_candidates_are_considered() {
        let candidates = questions(1..=10);
        let mut rng = StdRng::seed_from_u64(7);

        let seen: HashSet<i64> = (0..200)
            .filter_map(|_| pick_question(&candidates, &[], &mut rng))
            .map(|q| q.id)
            .collect();
        assert_eq!(seen, (1..=5).collect());
    }

    #[test]
    fn exhausted_window_yields_none() {
        let candidates = questions(1..=10);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(pick_question(&candidates, &[1, 2, 3, 4, 5], &mut rng), None);
        assert_eq!(pick_question(&[], &[], &mut rng), None);
    }

    #[test]
    fn same_seed_same_pick() {
        let candidates = questions(1..=5);
        let first = pick_question(&candidates, &[], &mut StdRng::seed_from_u64(99));
        let second = pick_question(&candidates, &[], &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn all_categories_render_as_empty_string() {
        assert_eq!(
            serde_json::to_value(CurrentCategory::All).unwrap(),
            serde_json::json!("")
        );
        let category = CurrentCategory::Category(Category {
            id: 1,
            kind: "Science".into(),
        });
        assert_eq!(
            serde_json::to_value(category).unwrap(),
            serde_json::json!({ "id": 1, "type": "Science" })
        );
    }
}

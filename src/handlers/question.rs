use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::{Category, NewQuestion, Question},
    extractors::{IdPath, JsonBody, Page},
    models::{self, QuestionsBody, QuestionsRequest},
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUESTIONS_URL, get(list_questions).post(post_questions))
        .route(names::QUESTION_URL, delete(delete_question))
}

#[derive(Serialize)]
struct QuestionPage {
    success: bool,
    questions: Vec<Question>,
    count: usize,
    categories: Vec<Category>,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct QuestionList {
    success: bool,
    questions: Vec<Question>,
    count: usize,
}

#[derive(Serialize)]
struct CreatedQuestion {
    success: bool,
    questions: Vec<Question>,
    created: i64,
    count: usize,
}

/// The slice of `items` shown on 1-based `page`; empty when the page is out of range.
pub fn page_window<T>(items: &[T], page: i64) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|idx| usize::try_from(idx).ok())
        .and_then(|idx| idx.checked_mul(names::QUESTIONS_PER_PAGE))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = (start + names::QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}

async fn list_questions(
    State(state): State<AppState>,
    Page(page): Page,
) -> Result<Json<QuestionPage>, AppError> {
    let questions = state
        .db
        .questions()
        .await
        .reject("could not list questions")?;

    let categories = state
        .db
        .categories()
        .await
        .reject("could not list categories")?;

    if questions.is_empty() {
        return Err(AppError::NotFound);
    }

    let window = page_window(&questions, page);
    if window.is_empty() {
        tracing::debug!("page {page} is beyond {} questions", questions.len());
        return Err(AppError::NotFound);
    }

    Ok(Json(QuestionPage {
        success: true,
        questions: window.to_vec(),
        count: questions.len(),
        categories,
        current_category: None,
    }))
}

async fn delete_question(
    State(state): State<AppState>,
    IdPath(question_id): IdPath,
) -> Result<Json<QuestionList>, AppError> {
    state
        .db
        .question(question_id)
        .await
        .reject("could not get question")?
        .ok_or(AppError::NotFound)?;

    state
        .db
        .delete_question(question_id)
        .await
        .reject("could not delete question")?;

    let questions = state
        .db
        .questions()
        .await
        .reject("could not list questions")?;

    // The delete has already happened; an emptied store still reports not found.
    if questions.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(QuestionList {
        success: true,
        count: questions.len(),
        questions,
    }))
}

async fn post_questions(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<QuestionsBody>,
) -> Result<Response, AppError> {
    let request = body.into_request().ok_or(AppError::Unprocessable)?;

    let questions = match request {
        QuestionsRequest::ByCategory(category_id) => state
            .db
            .questions_by_category(category_id)
            .await
            .reject("could not filter questions by category")?,
        QuestionsRequest::Search(term) => state
            .db
            .search_questions(&term)
            .await
            .reject("could not search questions")?,
        QuestionsRequest::Create(value) => {
            let new = models::parse_new_question(value).ok_or(AppError::Unprocessable)?;
            return create_question(&state, new).await;
        }
    };

    if questions.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(QuestionList {
        success: true,
        count: questions.len(),
        questions,
    })
    .into_response())
}

async fn create_question(state: &AppState, new: NewQuestion) -> Result<Response, AppError> {
    let existing = state
        .db
        .questions_with_text(&new.question)
        .await
        .reject("could not look up question text")?;

    if !existing.is_empty() {
        tracing::info!("rejected duplicate question {:?}", new.question);
        return Err(AppError::Conflict);
    }

    let created = state
        .db
        .insert_question(&new)
        .await
        .reject_input("could not insert question")?;

    let questions = state
        .db
        .questions()
        .await
        .reject_input("could not list questions")?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedQuestion {
            success: true,
            count: questions.len(),
            questions,
            created,
        }),
    )
        .into_response())
}

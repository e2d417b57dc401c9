use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    db::{Category, Question},
    extractors::IdPath,
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::CATEGORIES_URL, get(list_categories))
        .route(names::CATEGORY_QUESTIONS_URL, get(category_questions))
}

#[derive(Serialize)]
struct CategoryList {
    success: bool,
    count: usize,
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    count: usize,
    questions: Vec<Question>,
    current_category: String,
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoryList>, AppError> {
    let categories = state
        .db
        .categories()
        .await
        .reject("could not list categories")?;

    if categories.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(CategoryList {
        success: true,
        count: categories.len(),
        categories,
    }))
}

async fn category_questions(
    State(state): State<AppState>,
    IdPath(category_id): IdPath,
) -> Result<Json<CategoryQuestions>, AppError> {
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

    if questions.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(CategoryQuestions {
        success: true,
        count: questions.len(),
        questions,
        current_category: category.kind,
    }))
}

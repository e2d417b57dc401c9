pub mod category;
pub mod question;
pub mod quiz;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(question::routes())
        .merge(category::routes())
        .merge(quiz::routes())
}

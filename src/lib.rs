pub mod db;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;

use std::sync::{Arc, Mutex};

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use rand::{rngs::StdRng, SeedableRng};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    /// Source for quiz picks. Seeded when reproducible sessions are wanted.
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(db: db::Db, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            db,
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::routes())
        .fallback(rejections::not_found)
        .layer(middleware::from_fn(access_control_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn access_control_headers(req: Request, next: Next) -> Response {
    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(names::ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(names::ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(names::ALLOW_METHODS),
    );

    resp
}

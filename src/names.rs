pub const QUESTIONS_URL: &str = "/questions";
pub const QUESTION_URL: &str = "/questions/{id}";
pub const CATEGORIES_URL: &str = "/categories";
pub const CATEGORY_QUESTIONS_URL: &str = "/categories/{id}/questions";
pub const QUIZZES_URL: &str = "/quizzes";

pub fn question_url(question_id: i64) -> String {
    format!("/questions/{question_id}")
}

pub fn category_questions_url(category_id: i64) -> String {
    format!("/categories/{category_id}/questions")
}

// Listing
pub const QUESTIONS_PER_PAGE: usize = 10;
pub const DEFAULT_PAGE: i64 = 1;

// Quiz play: only the first few candidates in store order are considered
pub const QUIZ_WINDOW: usize = 5;

// Response headers
pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const ALLOW_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";

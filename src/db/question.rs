use color_eyre::Result;

use super::models::{NewQuestion, Question};
use super::Db;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

impl Db {
    /// All questions in the store's natural (insertion) order.
    pub async fn questions(&self) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    pub async fn question(&self, question_id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?"
        ))
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn questions_by_category(&self, category_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE category = ? ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Case-insensitive substring match on the question text, ordered by id.
    ///
    /// SQLite only folds ASCII case, so matching happens here with Unicode
    /// lowercasing. `term` is matched literally.
    pub async fn search_questions(&self, term: &str) -> Result<Vec<Question>> {
        let needle = term.to_lowercase();
        let questions = self
            .questions()
            .await?
            .into_iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .collect();

        Ok(questions)
    }

    /// Questions whose text is exactly `text`; used to reject duplicates before insert.
    pub async fn questions_with_text(&self, text: &str) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE question = ?"
        ))
        .bind(text)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Returns the id assigned by the store.
    pub async fn insert_question(&self, new: &NewQuestion) -> Result<i64> {
        let question_id = sqlx::query(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.question)
        .bind(&new.answer)
        .bind(new.category)
        .bind(new.difficulty)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::info!("new question created with id: {question_id}");
        Ok(question_id)
    }

    /// Returns whether a row was removed.
    pub async fn delete_question(&self, question_id: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(question_id)
            .execute(&self.pool)
            .await?
            .rows_affected()
            > 0;

        tracing::info!("question {question_id} deleted: {deleted}");
        Ok(deleted)
    }
}

use color_eyre::Result;

use super::models::Category;
use super::Db;

impl Db {
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    pub async fn category(&self, category_id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, type FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Categories are not exposed for writing over HTTP; this seeds the store.
    pub async fn insert_category(&self, kind: &str) -> Result<i64> {
        let category_id = sqlx::query("INSERT INTO categories (type) VALUES (?)")
            .bind(kind)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::info!("new category {kind:?} created with id: {category_id}");
        Ok(category_id)
    }
}

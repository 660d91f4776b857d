//! # Category Repository

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::input::CategoryInput;
use kasir_core::{Category, Page, PageRequest, Pagination};

const COLUMNS: &str = "id, name, image, description, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Pages through categories whose name contains `page.search`.
    pub async fn list(&self, page: &PageRequest) -> DbResult<Page<Category>> {
        debug!(page = page.page, search = %page.search, "Listing categories");

        let pattern = page.like_pattern();

        let items = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE name LIKE ?1 ORDER BY id DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name LIKE ?1")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    /// Every category, alphabetical. Feeds the product form's dropdown.
    pub async fn all(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        debug!(id, "Getting category by ID");

        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn create(&self, input: &CategoryInput) -> DbResult<Category> {
        input.validate()?;
        debug!(name = %input.name, "Creating category");

        let now = Utc::now();
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, image, description, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {COLUMNS}"
        ))
        .bind(input.name.trim())
        .bind(input.image.trim())
        .bind(input.description.trim())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn update(&self, id: i64, input: &CategoryInput) -> DbResult<Category> {
        input.validate()?;
        debug!(id, "Updating category");

        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET name = ?2, image = ?3, description = ?4, updated_at = ?5 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.trim())
        .bind(input.image.trim())
        .bind(input.description.trim())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        category.ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category. Fails with a foreign key violation while products
    /// still reference it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{category, product, test_db};

    #[tokio::test]
    async fn test_create_update_get() {
        let db = test_db().await;
        let repo = db.categories();

        let created = category(&db, "Minuman").await;
        assert_eq!(created.name, "Minuman");

        let updated = repo
            .update(
                created.id,
                &CategoryInput {
                    name: "Minuman Dingin".to_string(),
                    description: "es".to_string(),
                    image: "es.png".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Minuman Dingin");

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.image, "es.png");
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let db = test_db().await;
        let err = db
            .categories()
            .create(&CategoryInput {
                name: "Snack".to_string(),
                description: String::new(),
                image: "s.png".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(_)));
    }

    #[tokio::test]
    async fn test_all_sorted_and_search() {
        let db = test_db().await;
        category(&db, "Snack").await;
        category(&db, "Minuman").await;
        category(&db, "Makanan").await;

        let names: Vec<String> = db
            .categories()
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Makanan", "Minuman", "Snack"]);

        let page = db
            .categories()
            .list(&PageRequest {
                search: "M".to_string(),
                ..PageRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_delete_in_use_is_rejected() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;
        product(&db, cat.id, "8991", 1, 2, 3).await;

        let err = db.categories().delete(cat.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let empty = category(&db, "Kosong").await;
        db.categories().delete(empty.id).await.unwrap();
        assert!(db.categories().get_by_id(empty.id).await.unwrap().is_none());
    }
}

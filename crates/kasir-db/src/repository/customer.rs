//! # Customer Repository
//!
//! Customers are optional on a sale. Deleting one keeps its transactions and
//! clears their `customer_id`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::input::CustomerInput;
use kasir_core::{Customer, Page, PageRequest, Pagination};

const COLUMNS: &str = "id, name, no_telp, address, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    pub async fn list(&self, page: &PageRequest) -> DbResult<Page<Customer>> {
        debug!(page = page.page, search = %page.search, "Listing customers");

        let pattern = page.like_pattern();

        let items = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers WHERE name LIKE ?1 ORDER BY id DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE name LIKE ?1")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    pub async fn all(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        debug!(id, "Getting customer by ID");

        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn create(&self, input: &CustomerInput) -> DbResult<Customer> {
        input.validate()?;
        debug!(name = %input.name, "Creating customer");

        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (name, no_telp, address, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {COLUMNS}"
        ))
        .bind(input.name.trim())
        .bind(input.no_telp.trim())
        .bind(input.address.trim())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn update(&self, id: i64, input: &CustomerInput) -> DbResult<Customer> {
        input.validate()?;
        debug!(id, "Updating customer");

        let customer = sqlx::query_as::<_, Customer>(&format!(
            "UPDATE customers SET name = ?2, no_telp = ?3, address = ?4, updated_at = ?5 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.trim())
        .bind(input.no_telp.trim())
        .bind(input.address.trim())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        customer.ok_or_else(|| DbError::not_found("Customer", id))
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;

    fn input(name: &str) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            no_telp: "08123456789".to_string(),
            address: "Jl. Merdeka 1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let db = test_db().await;
        let repo = db.customers();

        let created = repo.create(&input("Budi")).await.unwrap();
        assert_eq!(created.no_telp, "08123456789");

        let updated = repo.update(created.id, &input("Budi S")).await.unwrap();
        assert_eq!(updated.name, "Budi S");
        assert!(updated.updated_at >= created.updated_at);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.update(created.id, &input("X")).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_and_all() {
        let db = test_db().await;
        let repo = db.customers();
        for name in ["Citra", "Budi", "Andi", "Bayu"] {
            repo.create(&input(name)).await.unwrap();
        }

        let all: Vec<String> = repo.all().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(all, ["Andi", "Bayu", "Budi", "Citra"]);

        let page = repo
            .list(&PageRequest {
                page: 1,
                limit: 1,
                search: "B".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items[0].name, "Bayu");
    }
}

//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Title search and per-category listing (paginated, newest first)
//! - Barcode lookup for the scanner
//! - CRUD operations
//! - Low-stock listing for the dashboard
//!
//! Stock is only ever decremented by checkout (see `transaction.rs`); here it
//! is set directly from the product form.
//!
//! ## Category Join
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products p                         categories c                        │
//! │  ┌───────────────────────────┐      ┌──────────────────┐                │
//! │  │ 8991001 | Kopi | cat 1    │─────►│ 1 | Minuman      │                │
//! │  │ 8991002 | Teh  | cat 1    │─────►│                  │                │
//! │  │ 8992001 | Roti | cat 2    │─────►│ 2 | Makanan      │                │
//! │  └───────────────────────────┘      └──────────────────┘                │
//! │                                                                         │
//! │  Every read returns Product { ..., category_name }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::input::ProductInput;
use kasir_core::{Page, PageRequest, Pagination, Product};

pub(crate) const SELECT_PRODUCT: &str = "SELECT p.id, p.category_id, c.name AS category_name, \
     p.barcode, p.title, p.description, p.buy_price, p.sell_price, p.stock, p.image, \
     p.created_at, p.updated_at \
     FROM products p JOIN categories c ON c.id = p.category_id";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Scanner lookup
/// let product = repo.get_by_barcode("8991001").await?;
///
/// // Form save
/// let product = repo.update(id, &input).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Pages through products whose title contains `page.search`.
    ///
    /// ## Arguments
    /// * `page` - Page number, size and search term
    ///
    /// ## Returns
    /// Products newest first, each with its category name
    pub async fn list(&self, page: &PageRequest) -> DbResult<Page<Product>> {
        debug!(page = page.page, search = %page.search, "Listing products");

        let pattern = page.like_pattern();

        let items = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE p.title LIKE ?1 ORDER BY p.id DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE title LIKE ?1")
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    /// Pages through the products of one category.
    ///
    /// An unknown category is an empty page, not an error.
    pub async fn list_by_category(
        &self,
        category_id: i64,
        page: &PageRequest,
    ) -> DbResult<Page<Product>> {
        debug!(category_id, page = page.page, "Listing products by category");

        let pattern = page.like_pattern();

        let items = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE p.category_id = ?1 AND p.title LIKE ?2 \
             ORDER BY p.id DESC LIMIT ?3 OFFSET ?4"
        ))
        .bind(category_id)
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_id = ?1 AND title LIKE ?2",
        )
        .bind(category_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    /// Gets a product by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        debug!(id, "Getting product by ID");

        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by barcode.
    ///
    /// ## Use Case
    /// Barcode scanner input: scanner sends the barcode, we look up the
    /// product to put in the cart.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Getting product by barcode");

        let product =
            sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.barcode = ?1"))
                .bind(barcode.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(product)
    }

    /// Inserts a product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - barcode taken
    /// * `Err(DbError::NotFound)` - category doesn't exist
    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        input.validate()?;
        debug!(barcode = %input.barcode, "Creating product");

        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (
                category_id, barcode, title, description,
                buy_price, sell_price, stock, image,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING id
            "#,
        )
        .bind(input.category_id)
        .bind(input.barcode.trim())
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(input.buy_price)
        .bind(input.sell_price)
        .bind(input.stock)
        .bind(input.image.trim())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, input))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Replaces every editable field of a product.
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        input.validate()?;
        debug!(id, barcode = %input.barcode, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                category_id = ?2, barcode = ?3, title = ?4, description = ?5,
                buy_price = ?6, sell_price = ?7, stock = ?8, image = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.category_id)
        .bind(input.barcode.trim())
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(input.buy_price)
        .bind(input.sell_price)
        .bind(input.stock)
        .bind(input.image.trim())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, input))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product. Cart lines holding it go with it; a product that
    /// has been sold is kept (foreign key violation).
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Products with `stock <= threshold`, scarcest first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        debug!(threshold, "Listing low-stock products");

        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE p.stock <= ?1 ORDER BY p.stock ASC, p.id ASC"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts total products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Names the offending value of an insert/update failure.
fn write_error(err: sqlx::Error, input: &ProductInput) -> DbError {
    match DbError::from(err) {
        DbError::ForeignKeyViolation { .. } => DbError::not_found("Category", input.category_id),
        other => other.on_duplicate("barcode", input.barcode.trim()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{category, product, test_db};
    use kasir_core::{CoreError, Money, ValidationError};

    fn input(category_id: i64, barcode: &str) -> ProductInput {
        ProductInput {
            category_id,
            barcode: barcode.to_string(),
            title: "Kopi Susu".to_string(),
            description: "Botol 250ml".to_string(),
            buy_price: Money::from_cents(8_050),
            sell_price: Money::from_major(100),
            stock: 12,
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_joins_category() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;

        let created = db.products().create(&input(cat.id, "8991001")).await.unwrap();

        assert_eq!(created.category_name, "Minuman");
        assert_eq!(created.buy_price, Money::from_cents(8_050));
        assert_eq!(created.stock, 12);
    }

    #[tokio::test]
    async fn test_duplicate_barcode() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;
        db.products().create(&input(cat.id, "8991001")).await.unwrap();

        let err = db.products().create(&input(cat.id, "8991001")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value } if field == "barcode" && value == "8991001"
        ));
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let db = test_db().await;
        let err = db.products().create(&input(42, "8991001")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Category"));
    }

    #[tokio::test]
    async fn test_negative_stock_rejected() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;
        let mut bad = input(cat.id, "8991001");
        bad.stock = -1;

        assert!(matches!(
            db.products().create(&bad).await,
            Err(DbError::Domain(_))
        ));
    }

    #[tokio::test]
    async fn test_price_and_stock_upper_bounds() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;

        let mut pricey = input(cat.id, "8991001");
        pricey.sell_price = Money::from_major(50_000_000_000_000_000);
        assert!(matches!(
            db.products().create(&pricey).await,
            Err(DbError::Domain(CoreError::Validation(ValidationError::OutOfRange { .. })))
        ));

        let mut hoard = input(cat.id, "8991002");
        hoard.stock = kasir_core::MAX_STOCK + 1;
        assert!(matches!(
            db.products().create(&hoard).await,
            Err(DbError::Domain(CoreError::Validation(ValidationError::OutOfRange { .. })))
        ));

        let created = db.products().create(&input(cat.id, "8991003")).await.unwrap();
        assert!(db.products().update(created.id, &pricey).await.is_err());
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_and_barcode_lookup() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;
        let other = category(&db, "Makanan").await;
        let created = db.products().create(&input(cat.id, "8991001")).await.unwrap();

        let mut changed = input(other.id, "8991009");
        changed.stock = 3;
        let updated = db.products().update(created.id, &changed).await.unwrap();
        assert_eq!(updated.category_name, "Makanan");
        assert_eq!(updated.stock, 3);

        assert!(db.products().get_by_barcode("8991001").await.unwrap().is_none());
        let found = db.products().get_by_barcode("8991009").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        assert!(matches!(
            db.products().update(9999, &changed).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_by_category_and_search() {
        let db = test_db().await;
        let drinks = category(&db, "Minuman").await;
        let food = category(&db, "Makanan").await;
        product(&db, drinks.id, "A1", 1, 2, 5).await;
        product(&db, drinks.id, "A2", 1, 2, 5).await;
        product(&db, food.id, "B1", 1, 2, 5).await;

        let page = db
            .products()
            .list_by_category(drinks.id, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.items[0].barcode, "A2");

        let page = db
            .products()
            .list(&PageRequest {
                search: "B1".to_string(),
                ..PageRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].category_name, "Makanan");
    }

    #[tokio::test]
    async fn test_low_stock() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;
        product(&db, cat.id, "A", 1, 2, 50).await;
        product(&db, cat.id, "B", 1, 2, 10).await;
        product(&db, cat.id, "C", 1, 2, 0).await;

        let low: Vec<String> = db
            .products()
            .low_stock(10)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.barcode)
            .collect();
        assert_eq!(low, ["C", "B"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let cat = category(&db, "Minuman").await;
        let p = product(&db, cat.id, "A", 1, 2, 5).await;

        db.products().delete(p.id).await.unwrap();
        assert_eq!(db.products().count().await.unwrap(), 0);
        assert!(matches!(
            db.products().delete(p.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}

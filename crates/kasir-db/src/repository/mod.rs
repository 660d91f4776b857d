//! # Repository Layer
//!
//! Data access objects, one per aggregate.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repository Pattern                                 │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │ db.carts().add(cashier_id, product_id, qty)                    │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────┐              │
//! │  │              CartRepository                          │              │
//! │  │  ┌────────────────────────────────────────────────┐  │              │
//! │  │  │ pub async fn add(&self, ...) -> DbResult<...>  │  │              │
//! │  │  │   INSERT ... ON CONFLICT DO UPDATE ...         │  │              │
//! │  │  └────────────────────────────────────────────────┘  │              │
//! │  └──────────────────────────────────────────────────────┘              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlitePool → SQLite Database                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every cart and checkout call takes the owning cashier's id and filters on
//! it; there is no ambient "current user" below the HTTP layer.

pub mod cart;
pub mod category;
pub mod customer;
pub mod product;
pub mod report;
pub mod transaction;
pub mod user;

pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

/// Fixtures shared by repository tests.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::pool::{Database, DbConfig};
    use kasir_core::input::{CategoryInput, NewUser, ProductInput};
    use kasir_core::{Category, Money, Product, User};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn cashier(db: &Database, email: &str) -> User {
        let input = NewUser {
            name: format!("Kasir {email}"),
            email: email.to_string(),
            password: "Rahasia1!".to_string(),
        };
        db.users().create(&input, "hash").await.unwrap()
    }

    pub async fn category(db: &Database, name: &str) -> Category {
        let input = CategoryInput {
            name: name.to_string(),
            description: format!("{name} category"),
            image: "category.png".to_string(),
        };
        db.categories().create(&input).await.unwrap()
    }

    /// Product with prices in whole currency units.
    pub async fn product(
        db: &Database,
        category_id: i64,
        barcode: &str,
        buy: i64,
        sell: i64,
        stock: i64,
    ) -> Product {
        let input = ProductInput {
            category_id,
            barcode: barcode.to_string(),
            title: format!("Produk {barcode}"),
            description: "demo".to_string(),
            buy_price: Money::from_major(buy),
            sell_price: Money::from_major(sell),
            stock,
            image: String::new(),
        };
        db.products().create(&input).await.unwrap()
    }
}

//! # Seed Data Generator
//!
//! Creates the admin account and a small demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! ## Generated Data
//! - User `admin@gmail.com` / `password`
//! - Categories with a handful of products each (prices in rupiah)
//! - One walk-in customer

use std::env;

use kasir_core::input::{CategoryInput, CustomerInput, ProductInput};
use kasir_core::password::hash_password;
use kasir_core::Money;
use kasir_db::{Database, DbConfig};

const ADMIN_NAME: &str = "Administrator";
const ADMIN_EMAIL: &str = "admin@gmail.com";
const ADMIN_PASSWORD: &str = "password";

/// (category, [(title, buy, sell, stock)])
const CATALOG: &[(&str, &[(&str, i64, i64, i64)])] = &[
    (
        "Minuman",
        &[
            ("Kopi Susu Botol", 8_000, 10_000, 40),
            ("Teh Manis Dingin", 3_000, 5_000, 60),
            ("Air Mineral 600ml", 2_000, 3_500, 120),
            ("Jus Jeruk", 7_500, 12_000, 8),
        ],
    ),
    (
        "Makanan",
        &[
            ("Roti Cokelat", 4_000, 6_000, 25),
            ("Nasi Goreng Instan", 2_500, 4_000, 70),
            ("Biskuit Kelapa", 5_000, 7_500, 5),
        ],
    ),
    (
        "Kebutuhan Rumah",
        &[
            ("Sabun Cuci Piring", 9_000, 12_500, 30),
            ("Tisu Gulung", 11_000, 15_000, 15),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    match db.users().get_by_email(ADMIN_EMAIL).await? {
        Some(_) => println!("• Admin user already exists"),
        None => {
            let hash = hash_password(ADMIN_PASSWORD)?;
            db.users().insert(ADMIN_NAME, ADMIN_EMAIL, &hash).await?;
            println!("✓ Created {} / {}", ADMIN_EMAIL, ADMIN_PASSWORD);
        }
    }

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping catalog to avoid duplicates.");
        return Ok(());
    }

    let mut generated = 0;
    for (category_idx, (category_name, products)) in CATALOG.iter().enumerate() {
        let category = db
            .categories()
            .create(&CategoryInput {
                name: category_name.to_string(),
                description: format!("Produk {}", category_name.to_lowercase()),
                image: format!("categories/{}.png", category_idx + 1),
            })
            .await?;

        for (product_idx, (title, buy, sell, stock)) in products.iter().enumerate() {
            let input = ProductInput {
                category_id: category.id,
                barcode: format!("899{:02}{:05}", category_idx + 1, product_idx + 1),
                title: title.to_string(),
                description: title.to_string(),
                buy_price: Money::from_major(*buy),
                sell_price: Money::from_major(*sell),
                stock: *stock,
                image: String::new(),
            };

            if let Err(e) = db.products().create(&input).await {
                eprintln!("Failed to insert {}: {}", input.barcode, e);
                continue;
            }
            generated += 1;
        }
    }

    db.customers()
        .create(&CustomerInput {
            name: "Pelanggan Umum".to_string(),
            no_telp: "-".to_string(),
            address: "-".to_string(),
        })
        .await?;

    println!("✓ Generated {} products in {} categories", generated, CATALOG.len());
    println!("✓ Created walk-in customer");
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

//! # Seed Data Generator
//!
//! Populates the database with demo users and products for development.
//!
//! ## Usage
//! ```bash
//! # Default database path
//! cargo run -p tally-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p tally-db --bin seed -- --count 500 --db ./data/tally.db
//! ```
//!
//! Creates two operator accounts (one admin, one staff) and a product
//! catalog spread across a handful of categories, with stock levels that
//! exercise all three stock statuses.

use std::env;
use tally_core::Role;
use tally_db::{Database, DbConfig, NewProduct};

/// Category code, display name, and product names.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "BEV",
        "beverages",
        &[
            "Coca-Cola 330ml",
            "Pepsi 330ml",
            "Sprite 330ml",
            "Mineral Water 500ml",
            "Orange Juice 1L",
            "Apple Juice 1L",
            "Iced Tea 500ml",
            "Energy Drink 250ml",
        ],
    ),
    (
        "SNK",
        "snacks",
        &[
            "Salted Chips",
            "Nacho Chips",
            "Chocolate Bar",
            "Biscuits Pack",
            "Gummy Bears",
            "Pretzels",
            "Salted Peanuts",
            "Popcorn",
        ],
    ),
    (
        "DRY",
        "dairy",
        &[
            "Whole Milk 1L",
            "Low-Fat Milk 1L",
            "Cheddar Cheese 200g",
            "Butter 250g",
            "Greek Yogurt",
            "Eggs Dozen",
        ],
    ),
    (
        "GRO",
        "grocery",
        &[
            "White Bread",
            "Wheat Bread",
            "Spaghetti 500g",
            "White Rice 1kg",
            "Canned Beans",
            "Canned Soup",
            "Peanut Butter",
            "Honey 250g",
            "Flour 1kg",
            "Sugar 1kg",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./tally_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./tally_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tally POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Operator accounts for logging in during development.
    let admin = db.users().insert("Demo Admin", Role::Admin).await?;
    let staff = db.users().insert("Demo Cashier", Role::Staff).await?;
    println!("✓ Created users: admin={} staff={}", admin.id, staff.id);

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (code, category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let seed = category_idx * 100 + name_idx;
            let product = generate_product(code, category, name, seed);

            if let Err(e) = db.products().insert(&product).await {
                eprintln!("Failed to insert {}: {}", product.sku, e);
                continue;
            }

            generated += 1;
            if generated % 50 == 0 {
                println!("  Generated {} products...", generated);
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    let low = db.products().list_low_stock().await?;
    println!("  {} products start low or out of stock", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random figures.
fn generate_product(code: &str, category: &str, name: &str, seed: usize) -> NewProduct {
    // Selling price $0.99 - $8.99, purchase at 60-80% of that.
    let selling_price_cents = 99 + ((seed * 37) % 800) as i64;
    let cost_pct = 60 + (seed % 20) as i64;
    let purchase_price_cents = selling_price_cents * cost_pct / 100;

    // Stock 0-40 against a threshold of 5 so every status shows up.
    let quantity = ((seed * 13) % 41) as i64;

    NewProduct {
        name: name.to_string(),
        sku: format!("{}-{:03}", code, seed),
        category: category.to_string(),
        brand: String::new(),
        purchase_price_cents,
        selling_price_cents,
        quantity,
        min_stock: Some(5),
    }
}

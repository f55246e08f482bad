//! # Seed Data Generator
//!
//! Populates the database with development products and customers.
//!
//! ## Usage
//! ```bash
//! # Default database (./dukkan.db), default product count
//! cargo run -p dukkan-db --bin seed
//!
//! # Custom count and path
//! cargo run -p dukkan-db --bin seed -- --count 500 --db ./data/dukkan.db
//! ```

use std::env;

use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use dukkan_core::{Customer, CustomerType, Product};
use dukkan_db::{Database, DbConfig};

/// (category code, [(english name, arabic name, base price in minor units)])
const CATEGORIES: &[(&str, &[(&str, &str, i64)])] = &[
    (
        "BEV",
        &[
            ("Laban 1L", "لبن ١ لتر", 600),
            ("Orange Juice 1L", "عصير برتقال ١ لتر", 900),
            ("Water 600ml", "ماء ٦٠٠ مل", 150),
            ("Arabic Coffee 250g", "قهوة عربية ٢٥٠ جم", 2400),
            ("Mint Tea 100bags", "شاي بالنعناع ١٠٠ كيس", 1400),
        ],
    ),
    (
        "GRO",
        &[
            ("Basmati Rice 5kg", "أرز بسمتي ٥ كجم", 4500),
            ("Sunflower Oil 1.5L", "زيت دوار الشمس ١٫٥ لتر", 2200),
            ("Sugar 2kg", "سكر ٢ كجم", 1100),
            ("Flour 2kg", "دقيق ٢ كجم", 900),
            ("Dates 1kg", "تمر ١ كجم", 2800),
        ],
    ),
    (
        "SNK",
        &[
            ("Potato Chips", "شيبس بطاطس", 350),
            ("Chocolate Bar", "لوح شوكولاتة", 450),
            ("Salted Peanuts 200g", "فول سوداني مملح ٢٠٠ جم", 550),
            ("Maamoul Box", "علبة معمول", 1600),
        ],
    ),
];

const CUSTOMERS: &[(&str, &str, CustomerType, i64)] = &[
    ("Abu Khalid", "0501111111", CustomerType::Regular, 50_000),
    ("Umm Sara", "0502222222", CustomerType::Regular, 30_000),
    ("Al-Noor Restaurant", "0503333333", CustomerType::Wholesale, 500_000),
    ("Bin Saleh Trading", "0504444444", CustomerType::Vip, 1_000_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (db_path, count) = parse_args();

    println!("Seeding database at {}", db_path);
    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!();
    println!("Generating products...");
    let mut generated = 0usize;

    'outer: for (category, products) in CATEGORIES {
        for (idx, (name, name_ar, base_price)) in products.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let product = generate_product(category, name, name_ar, *base_price, idx);
            if let Err(e) = db.products().insert(&product).await {
                eprintln!("Failed to insert {}: {}", product.sku, e);
                continue;
            }
            generated += 1;
        }
    }

    println!("✓ Generated {} products", generated);

    println!();
    println!("Generating customers...");
    let now = Utc::now();
    for (name, phone, customer_type, credit_limit_cents) in CUSTOMERS {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: Some(phone.to_string()),
            email: None,
            address: None,
            tax_number: None,
            customer_type: *customer_type,
            credit_limit_cents: *credit_limit_cents,
            balance_cents: 0,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = db.customers().insert(&customer).await {
            eprintln!("Failed to insert customer {}: {}", customer.name, e);
        }
    }
    println!("✓ Generated {} customers", CUSTOMERS.len());

    let total = db.products().count().await?;
    println!();
    println!("✓ Seed complete! {} active products in catalog", total);

    Ok(())
}

/// Parses `--db <path>` and `--count <n>` from the command line.
fn parse_args() -> (String, usize) {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./dukkan.db".to_string();
    let mut count = usize::MAX;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            "--count" if i + 1 < args.len() => {
                count = args[i + 1].parse().unwrap_or(usize::MAX);
                i += 2;
            }
            _ => i += 1,
        }
    }

    (db_path, count)
}

/// Generates a single product with plausible data.
fn generate_product(
    category: &str,
    name: &str,
    name_ar: &str,
    base_price: i64,
    idx: usize,
) -> Product {
    let now = Utc::now();

    let sku = format!("{}-{:03}", category, idx + 1);
    let barcode = Some(format!("628{:010}", idx * 37 + base_price as usize));

    // Cost at 60-80% of the selling price
    let cost_pct = 60 + (idx % 20) as i64;
    let cost_cents = base_price * cost_pct / 100;

    Product {
        id: Uuid::new_v4().to_string(),
        sku,
        barcode,
        name: name.to_string(),
        name_ar: name_ar.to_string(),
        description: None,
        unit: "piece".to_string(),
        cost_cents,
        selling_cents: base_price,
        stock_quantity: (idx as i64 * 7) % 80 + 5,
        min_stock_level: 5,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

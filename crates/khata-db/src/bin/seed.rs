//! # Demo Data Generator
//!
//! Populates a database with a few weeks of shop activity for development.
//!
//! ## Usage
//! ```bash
//! # Generate 14 days of activity (default)
//! cargo run -p khata-db --bin seed
//!
//! # Custom number of days
//! cargo run -p khata-db --bin seed -- --days 30
//!
//! # Specify database path
//! cargo run -p khata-db --bin seed -- --db ./data/khata.db
//! ```
//!
//! ## Generated Activity
//! Every record goes through the khata-core operations, so creditor
//! balances and settled sales are consistent with real usage:
//! - Cash, card and online sales across every product type
//! - Credit sales for a handful of regular customers
//! - Daily expenses (rent, electricity, tea)
//! - Periodic creditor payments, some partial

use chrono::{Duration, Utc};
use clap::Parser;

use khata_core::{
    add_expense, create_sale, record_payment, Books, ExpenseForm, Money, PaymentMethod,
    ProductType, SaleForm,
};
use khata_db::{Database, DbConfig};

/// Item names and base prices (rupees) per product type.
const CATALOG: &[(ProductType, &[(&str, i64)])] = &[
    (
        ProductType::Refill,
        &[("Tokyo Ice Mint 30ml", 1500), ("Mango Ice 30ml", 1400), ("Strawberry Kiwi 30ml", 1450)],
    ),
    (
        ProductType::Coil,
        &[("Mesh 0.4", 450), ("Mesh 0.6", 450), ("Mesh 0.8", 400), ("Pod Cartridge", 600)],
    ),
    (
        ProductType::Device,
        &[("Xros 3", 6500), ("Caliburn G2", 5800), ("Drag Nano 2", 7200)],
    ),
    (
        ProductType::Puff,
        &[("Elf Bar 5000", 2200), ("Lost Mary 3500", 1900)],
    ),
    (
        ProductType::FlavourBottle,
        &[("Blueberry Bottle", 900), ("Grape Bottle", 850)],
    ),
];

/// Regular credit customers.
const CUSTOMERS: &[(&str, &str)] = &[
    ("Ali", "03001234567"),
    ("Sara", "03451234567"),
    ("Bilal", "03211234567"),
];

const METHODS: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Online];

/// Khata POS demo data generator.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct SeedArgs {
    /// Days of activity to generate
    #[arg(short = 'n', long, default_value_t = 14, value_parser = clap::value_parser!(i64).range(1..=365))]
    days: i64,

    /// Database file path
    #[arg(short = 'd', long = "db", default_value = "./khata_dev.db")]
    db_path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let SeedArgs { days, db_path } = SeedArgs::parse();

    println!("🌱 Khata POS Demo Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let store = db.books();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = store.load_all().await;
    if !existing.sales.is_empty() || !existing.creditors.is_empty() {
        println!(
            "⚠ Database already has {} sales and {} creditors",
            existing.sales.len(),
            existing.creditors.len()
        );
        println!("  Skipping seed to avoid duplicates.");
        println!("  Run `khata data clear` or delete the database file to regenerate.");
        return Ok(());
    }

    let books = generate(days)?;
    store.save_all(&books).await?;

    println!();
    println!("✓ Generated {} sales", books.sales.len());
    println!("✓ Generated {} expenses", books.expenses.len());
    println!("✓ Generated {} payments", books.payments.len());
    println!(
        "✓ {} creditors owe {}",
        books.creditors.len(),
        books.creditors.total_owed()
    );
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds `days` days of activity ending today.
fn generate(days: i64) -> Result<Books, Box<dyn std::error::Error>> {
    let mut books = Books::new();
    let start = Utc::now() - Duration::days(days);
    let mut seed: usize = 7;

    for day in 0..days {
        let opening = start + Duration::days(day) + Duration::hours(11);

        for sale_no in 0..6 {
            seed = seed.wrapping_mul(31).wrapping_add(17) % 10_007;
            let (product_type, items) = CATALOG[seed % CATALOG.len()];
            let (item_name, price) = items[seed % items.len()];
            let quantity = 1 + (seed % 3) as i64;
            let amount = (price * quantity).to_string();
            let at = opening + Duration::minutes(sale_no * 47);

            let form = if seed % 5 == 0 {
                let (name, phone) = CUSTOMERS[seed % CUSTOMERS.len()];
                SaleForm::credit(product_type, item_name, quantity.to_string(), amount, name, phone)
            } else {
                let method = METHODS[seed % METHODS.len()];
                SaleForm::cash(product_type, item_name, quantity.to_string(), amount, method)
            };
            create_sale(&mut books, &form, at)?;
        }

        let closing = opening + Duration::hours(9);
        add_expense(&mut books, &ExpenseForm::new("Tea and snacks", "300", "staff"), closing)?;
        if day % 7 == 0 {
            add_expense(&mut books, &ExpenseForm::new("Electricity bill", "4500", "bills"), closing)?;
        }

        // Every third day the first creditor pays half (or all, if small).
        if day % 3 == 2 {
            if let Some(creditor) = books.creditors.get(0) {
                let owed = creditor.amount_owed;
                let half = Money::from_cents(owed.cents() / 2);
                let pay = if owed.cents() < 100_000 { owed } else { half };
                let raw = format!("{}.{:02}", pay.major(), pay.cents_part());
                record_payment(&mut books, 0, &raw, closing)?;
            }
        }
    }

    add_expense(&mut books, &ExpenseForm::new("Shop rent", "35000", "rent"), Utc::now())?;
    Ok(books)
}

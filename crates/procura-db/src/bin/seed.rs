//! # Seed Data Generator
//!
//! Populates the database with vendors and products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products across 8 vendors (default)
//! cargo run -p procura-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p procura-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p procura-db --bin seed -- --db ./data/procura.db
//! ```
//!
//! ## Generated Data
//! - Vendors with sequential display ids (V001, V002, ...)
//! - Products spread across categories (packaging, beverages, cleaning,
//!   stationery, produce), each assigned to a vendor round-robin
//! - Stock levels and reorder points sized so some products start below
//!   their reorder level

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use procura_core::{Product, ProductPoState, Unit, Vendor};
use procura_db::{Database, DbConfig};

/// Vendor fixtures: (name, gst, city)
const VENDORS: &[(&str, &str, &str)] = &[
    ("Acme Supplies", "GST-1001", "Springfield"),
    ("Borealis Trading Co", "GST-1002", "Portland"),
    ("Cascade Packaging", "GST-1003", "Tacoma"),
    ("Delta Beverages", "GST-1004", "Memphis"),
    ("Evergreen Produce", "GST-1005", "Boise"),
    ("Foundry Paper Goods", "GST-1006", "Pittsburgh"),
    ("Granite Cleaning Supply", "GST-1007", "Concord"),
    ("Harbor Wholesale", "GST-1008", "Galveston"),
];

/// Product categories: (category, names)
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Packaging",
        &[
            "Corrugated Box Small",
            "Corrugated Box Medium",
            "Corrugated Box Large",
            "Bubble Wrap Roll",
            "Packing Tape",
            "Stretch Film",
            "Paper Bags",
            "Mailer Envelopes",
        ],
    ),
    (
        "Beverages",
        &[
            "Sparkling Water Case",
            "Orange Juice Carton",
            "Cold Brew Concentrate",
            "Green Tea Bottles",
            "Lemonade Jugs",
            "Espresso Beans",
        ],
    ),
    (
        "Cleaning",
        &[
            "Glass Cleaner",
            "Floor Degreaser",
            "Disinfectant Wipes",
            "Nitrile Gloves",
            "Trash Liners",
            "Microfiber Cloths",
        ],
    ),
    (
        "Stationery",
        &[
            "Thermal Receipt Rolls",
            "Ballpoint Pens",
            "Label Sheets",
            "Clipboard",
            "Archive Folders",
            "Shipping Labels",
        ],
    ),
    (
        "Produce",
        &[
            "Roma Tomatoes Crate",
            "Yellow Onions Sack",
            "Russet Potatoes Sack",
            "Lemons Case",
            "Garlic Box",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./procura_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: seed [--count N] [--db PATH]");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    println!("Seeding {} products into {}", count, db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;

    // Vendors first so products can reference them
    let vendor_repo = db.vendors();
    let mut vendor_ids = Vec::new();
    for (name, gst, city) in VENDORS {
        if let Some(existing) = vendor_repo.find_by_name(name).await? {
            vendor_ids.push(existing.id);
            continue;
        }

        let now = Utc::now();
        let vendor = Vendor {
            id: Uuid::new_v4().to_string(),
            display_id: vendor_repo.next_display_id().await?,
            name: name.to_string(),
            gst_number: Some(gst.to_string()),
            address: Some(format!("{} Industrial Park", city)),
            phone: None,
            contact_name: None,
            contact_email: None,
            created_at: now,
            updated_at: now,
        };
        vendor_repo.insert(&vendor).await?;
        vendor_ids.push(vendor.id);
    }
    println!("Vendors ready: {}", vendor_ids.len());

    // Products, round-robin over categories/names/vendors
    let product_repo = db.products();
    let names_total: usize = CATEGORIES.iter().map(|(_, names)| names.len()).sum();
    let mut created = 0usize;
    let mut seq = 0usize;
    'outer: loop {
        for (category, names) in CATEGORIES {
            for name in *names {
                if created >= count {
                    break 'outer;
                }
                seq += 1;

                let now = Utc::now();
                // Deterministic spread: every 4th product starts below its
                // reorder level, units alternate
                let current_stock = ((seq * 7) % 40) as i64;
                let reorder_level = if seq % 4 == 0 { current_stock + 5 } else { 5 };
                let unit = if seq % 3 == 0 { Unit::Boxes } else { Unit::Pcs };

                let product = Product {
                    id: Uuid::new_v4().to_string(),
                    display_id: Some(format!("P{:04}", seq)),
                    name: if seq <= names_total {
                        name.to_string()
                    } else {
                        format!("{} #{}", name, seq)
                    },
                    brand: "House".to_string(),
                    category: category.to_string(),
                    unit,
                    vendor_id: Some(vendor_ids[seq % vendor_ids.len()].clone()),
                    current_stock,
                    reorder_level,
                    po_quantity: ((seq % 9) + 1) as i64,
                    po_status: ProductPoState::Available,
                    include_in_create_po: true,
                    created_at: now,
                    updated_at: now,
                };
                product_repo.insert(&product).await?;
                created += 1;
            }
        }
    }

    println!("Seeded {} products", created);
    println!(
        "Totals: {} vendors, {} products",
        vendor_repo.count().await?,
        product_repo.count().await?
    );

    Ok(())
}

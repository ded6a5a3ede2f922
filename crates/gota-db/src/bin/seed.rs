//! # Seed Data Generator
//!
//! Populates the database with the production store fleet, default
//! commission settings, and sample customers/influencers for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p gota-db --bin seed
//!
//! # Specify database path
//! cargo run -p gota-db --bin seed -- --db ./data/gota.db
//! ```
//!
//! ## Generated Data
//! - The five store locations (Luanda, Viana, Benguela, Lobito, Huambo)
//! - Default commission settings (5% base, Kz 50 threshold, Kz 1000 cap)
//! - A handful of customers spread across the tier ladder
//! - Two influencers: one earning Gold, one below the activity minimum

use chrono::Utc;
use std::env;
use uuid::Uuid;

use gota_core::{
    CommissionSettings, Customer, Influencer, InfluencerStatus, Store, StoreStatus, TierId,
};
use gota_db::{Database, DbConfig};

/// The production store fleet: (name, city, address, latitude, longitude).
const STORES: &[(&str, &str, &str, f64, f64)] = &[
    (
        "Gota Central",
        "Luanda",
        "Rua Rainha Ginga 142, Ingombota",
        -8.8383,
        13.2344,
    ),
    (
        "Gota Viana",
        "Viana",
        "Estrada de Catete km 12",
        -8.9035,
        13.3617,
    ),
    (
        "Gota Benguela",
        "Benguela",
        "Avenida Norton de Matos 27",
        -12.5778,
        13.4077,
    ),
    (
        "Gota Lobito",
        "Lobito",
        "Rua do Porto, Canata",
        -12.3598,
        13.5361,
    ),
    (
        "Gota Huambo",
        "Huambo",
        "Largo do Comercio 8",
        -12.7761,
        15.7392,
    ),
];

/// Sample customers: (name, cumulative liters, tier).
const CUSTOMERS: &[(&str, i64, TierId)] = &[
    ("Adalberto Neto", 12, TierId::Lead),
    ("Luzia Bumba", 75, TierId::Silver),
    ("Osvaldo Capemba", 180, TierId::Gold),
    ("Teresa Van-Dunem", 340, TierId::Platinum),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./gota_dev.db");

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
                println!("Gota Loyalty Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./gota_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Gota Loyalty Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.stores().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} stores", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Commission settings
    db.settings().save(&CommissionSettings::default()).await?;
    println!("✓ Default commission settings saved");

    // Store fleet
    let now = Utc::now();
    for (name, city, address, latitude, longitude) in STORES {
        db.stores()
            .insert(&Store {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                city: city.to_string(),
                address: address.to_string(),
                latitude: *latitude,
                longitude: *longitude,
                status: StoreStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("✓ Seeded {} stores", STORES.len());

    // Customers across the ladder
    for (name, liters, tier) in CUSTOMERS {
        db.customers()
            .insert(&Customer {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                phone: None,
                tier: *tier,
                cumulative_volume_liters: *liters,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("✓ Seeded {} customers", CUSTOMERS.len());

    // One earning influencer, one below the activity minimum
    db.influencers()
        .insert(&Influencer {
            id: Uuid::new_v4().to_string(),
            name: "Marisa Kiala".to_string(),
            tier: TierId::Gold,
            referral_count: 27,
            active_clients: 16,
            cumulative_sales_cents: 418_000,
            monthly_commission_cents: 12_350,
            pending_payout_cents: 6_200,
            status: InfluencerStatus::Active,
            created_at: now,
            updated_at: now,
        })
        .await?;
    db.influencers()
        .insert(&Influencer {
            id: Uuid::new_v4().to_string(),
            name: "Helder Quintas".to_string(),
            tier: TierId::Silver,
            referral_count: 11,
            active_clients: 6,
            cumulative_sales_cents: 93_500,
            monthly_commission_cents: 0,
            pending_payout_cents: 1_450,
            status: InfluencerStatus::Inactive,
            created_at: now,
            updated_at: now,
        })
        .await?;
    println!("✓ Seeded 2 influencers");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

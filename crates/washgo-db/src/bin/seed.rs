//! # Demo Data Seeder
//!
//! Populates a database with a small Wash&Go catalog, one company and a few
//! engagements, mints their document numbers and prints the invoice lines.
//!
//! ## Usage
//! ```bash
//! # Seed the database from washgo.toml (or ./washgo.db)
//! cargo run -p washgo-db --bin seed
//!
//! # Specify database path
//! cargo run -p washgo-db --bin seed -- --db ./data/washgo.db
//!
//! # More logging
//! RUST_LOG=debug cargo run -p washgo-db --bin seed
//! ```

use chrono::{Duration, TimeZone, Utc};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use washgo_core::reports::{category_summary, invoice_rows};
use washgo_core::{
    price_engagement, ClientId, Company, CompanyId, DocumentKind, Engagement, EngagementId,
    EngagementStatus, Minutes, Money, OptionId, OptionOverride, Service, ServiceCategory,
    ServiceId, ServiceOption,
};
use washgo_db::{AppConfig, Database, DbConfig};

/// (service id, name, category, options as (id, label, cents, minutes))
const CATALOG: &[(&str, &str, ServiceCategory, &[(&str, &str, i64, u32)])] = &[
    (
        "voiture-interieur",
        "Nettoyage intérieur",
        ServiceCategory::Voiture,
        &[
            ("aspiration", "Aspiration complète", 2500, 30),
            ("sieges", "Shampoing sièges", 1500, 20),
            ("vitres", "Vitres intérieures", 1000, 15),
            ("odeurs", "Traitement anti-odeurs", 2000, 10),
        ],
    ),
    (
        "canape-tissu",
        "Canapé tissu",
        ServiceCategory::Canape,
        &[
            ("2-places", "2 places", 6000, 60),
            ("3-places", "3 places", 8000, 90),
            ("pouf", "Pouf", 1500, 15),
        ],
    ),
    (
        "tapis",
        "Tapis et moquettes",
        ServiceCategory::Textile,
        &[
            ("tapis-m2", "Tapis (m²)", 1200, 10),
            ("detachage", "Détachage", 2500, 20),
        ],
    ),
];

fn build_catalog() -> Vec<Service> {
    CATALOG
        .iter()
        .map(|(id, name, category, options)| Service {
            id: ServiceId::new(*id),
            name: name.to_string(),
            description: None,
            category: *category,
            options: options
                .iter()
                .map(|(oid, label, cents, minutes)| ServiceOption {
                    id: OptionId::new(*oid),
                    label: label.to_string(),
                    description: None,
                    default_duration: Minutes::new(*minutes),
                    unit_price: Money::from_cents(*cents),
                    vat_pct: Some(20.0),
                    active: true,
                })
                .collect(),
            active: true,
        })
        .collect()
}

fn build_engagements(company: &CompanyId) -> Vec<Engagement> {
    let base = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).single().unwrap_or_else(Utc::now);

    let mut car = Engagement::new(
        EngagementId::new("eng-0001"),
        ClientId::new("client-martin"),
        ServiceId::new("voiture-interieur"),
        base,
    );
    car.set_option_ids([OptionId::new("aspiration"), OptionId::new("sieges")]);
    car.set_override(
        OptionId::new("sieges"),
        OptionOverride::with_quantity(2).duration(Minutes::new(25)),
    );
    car.set_additional_charge(Money::from_cents(500));
    car.company_id = Some(company.clone());
    car.status = EngagementStatus::Realise;

    let mut sofa = Engagement::new(
        EngagementId::new("eng-0002"),
        ClientId::new("client-durand"),
        ServiceId::new("canape-tissu"),
        base + Duration::days(2),
    );
    sofa.set_option_ids([OptionId::new("3-places"), OptionId::new("pouf")]);
    sofa.company_id = Some(company.clone());
    sofa.invoice_vat_enabled = Some(false);
    sofa.status = EngagementStatus::Realise;

    let mut rug = Engagement::new(
        EngagementId::new("eng-0003"),
        ClientId::new("client-martin"),
        ServiceId::new("tapis"),
        base + Duration::days(9),
    );
    rug.set_option_ids([OptionId::new("tapis-m2"), OptionId::new("detachage")]);
    rug.set_override(
        OptionId::new("tapis-m2"),
        OptionOverride::with_quantity(6).unit_price(Money::from_cents(1000)),
    );
    rug.status = EngagementStatus::Envoye;

    vec![car, sofa, rug]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,washgo=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut db_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Wash&Go Demo Data Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: from config)");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => warn!(argument = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let mut config = AppConfig::load_or_default(config_path);
    if let Some(path) = db_path {
        config.database.path = path;
    }
    let settings = config.billing_settings();

    let db = Database::new(DbConfig::from_settings(&config.database)).await?;
    info!(path = %config.database.path.display(), "Connected, migrations applied");

    if db.catalog().count().await? > 0 {
        warn!("Catalog already populated, skipping seed. Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = build_catalog();
    for service in &catalog {
        db.catalog().insert_service(service).await?;
    }

    let company = Company {
        id: CompanyId::new("washgo-lyon"),
        name: "Wash&Go Lyon".to_string(),
        vat_enabled: true,
    };
    db.companies().insert(&company).await?;

    let engagements = build_engagements(&company.id);
    for engagement in &engagements {
        db.engagements().insert(engagement).await?;
    }

    let numbering = db.numbering();
    for engagement in &engagements {
        let date = engagement.scheduled_at.date_naive();
        let kind = match engagement.status {
            EngagementStatus::Realise => DocumentKind::Invoice,
            _ => DocumentKind::Quote,
        };
        numbering.mint(&engagement.id, kind, date).await?;
    }

    let stored = db.engagements().list().await?;
    let companies = db.companies().list().await?;
    let catalog = db.catalog().list_services(false).await?;

    println!();
    println!("Engagements");
    println!("===========");
    for engagement in &stored {
        let company = engagement
            .company_id
            .as_ref()
            .and_then(|id| washgo_core::find_company(&companies, id));
        let totals = price_engagement(engagement, &catalog, company, &settings);
        println!(
            "  {:<16} {:<8} HT {:>10}  TVA {:>9}  TTC {:>10}",
            washgo_core::display_document_number(engagement),
            engagement.kind.label(),
            totals.subtotal.to_string(),
            totals.vat_amount.to_string(),
            totals.total_ttc.to_string(),
        );
    }

    println!();
    println!("Invoices");
    println!("========");
    for row in invoice_rows(&stored, &catalog, &companies, &settings) {
        println!(
            "  {} {} {:<14} TTC {}",
            row.date.format("%d/%m/%Y"),
            row.number,
            row.client_id.as_str(),
            row.total_ttc
        );
    }

    println!();
    println!("Categories");
    println!("==========");
    for summary in category_summary(&catalog, &stored) {
        println!(
            "  {:<8} {} services, avg {} / {}, revenue {}",
            summary.category.as_str(),
            summary.service_count,
            summary.average_price,
            summary.average_duration,
            summary.revenue
        );
    }

    db.close().await;
    info!("Seed complete");
    Ok(())
}

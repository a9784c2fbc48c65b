//! # Catalog Repository
//!
//! Services and their priced options.
//!
//! ## Storage Layout
//! ```text
//! services                          service_options
//! ┌────────────────────────┐        ┌───────────────────────────────────┐
//! │ id  (PK)               │◄───────│ service_id (FK, ON DELETE CASCADE)│
//! │ name, description      │        │ id        (PK with service_id)    │
//! │ category  'Canapé'…    │        │ position  (display order)         │
//! │ active                 │        │ label, unit_price_cents, …        │
//! └────────────────────────┘        └───────────────────────────────────┘
//! ```
//!
//! A service and its options are always written together in one transaction.

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info};
use washgo_core::validation::validate_service;
use washgo_core::{CoreError, Minutes, Money, OptionId, Service, ServiceCategory, ServiceId, ServiceOption};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    description: Option<String>,
    category: ServiceCategory,
    active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct OptionRow {
    service_id: String,
    id: String,
    label: String,
    description: Option<String>,
    default_duration_min: String,
    unit_price_cents: i64,
    vat_pct: Option<f64>,
    active: bool,
}

impl TryFrom<OptionRow> for ServiceOption {
    type Error = DbError;

    fn try_from(row: OptionRow) -> DbResult<Self> {
        let minutes = Decimal::from_str(&row.default_duration_min).map_err(|e| {
            DbError::Serialization(format!(
                "service_options.default_duration_min '{}': {e}",
                row.default_duration_min
            ))
        })?;

        Ok(ServiceOption {
            id: OptionId::new(row.id),
            label: row.label,
            description: row.description,
            default_duration: Minutes::from_decimal(minutes),
            unit_price: Money::from_cents(row.unit_price_cents),
            vat_pct: row.vat_pct,
            active: row.active,
        })
    }
}

impl ServiceRow {
    fn into_service(self, options: Vec<ServiceOption>) -> Service {
        Service {
            id: ServiceId::new(self.id),
            name: self.name,
            description: self.description,
            category: self.category,
            options,
            active: self.active,
        }
    }
}

const SELECT_OPTIONS: &str = r#"
    SELECT service_id, id, label, description, default_duration_min,
           unit_price_cents, vat_pct, active
    FROM service_options
"#;

/// Repository for the service catalog.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a service with all of its options.
    ///
    /// The service is validated first; option order is preserved.
    pub async fn insert_service(&self, service: &Service) -> DbResult<()> {
        validate_service(service).map_err(CoreError::from)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO services (id, name, description, category, active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(service.id.as_str())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.category.as_str())
        .bind(service.active)
        .execute(&mut *tx)
        .await?;

        for (position, option) in service.options.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO service_options (
                    service_id, id, position, label, description,
                    default_duration_min, unit_price_cents, vat_pct, active
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(service.id.as_str())
            .bind(option.id.as_str())
            .bind(position as i64)
            .bind(&option.label)
            .bind(&option.description)
            .bind(option.default_duration.get().to_string())
            .bind(option.unit_price.cents())
            .bind(option.vat_pct)
            .bind(option.active)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            service_id = %service.id,
            options = service.options.len(),
            "Service inserted"
        );
        Ok(())
    }

    /// Gets a service with its options.
    pub async fn get_service(&self, id: &ServiceId) -> DbResult<Option<Service>> {
        let row: Option<ServiceRow> = sqlx::query_as(
            "SELECT id, name, description, category, active FROM services WHERE id = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let options: Vec<OptionRow> =
            sqlx::query_as(&format!("{SELECT_OPTIONS} WHERE service_id = ?1 ORDER BY position"))
                .bind(id.as_str())
                .fetch_all(&self.pool)
                .await?;

        let options = options
            .into_iter()
            .map(ServiceOption::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Some(row.into_service(options)))
    }

    /// Lists the catalog, ordered by category then name.
    ///
    /// This is the snapshot handed to the totals engine.
    pub async fn list_services(&self, active_only: bool) -> DbResult<Vec<Service>> {
        let rows: Vec<ServiceRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, category, active
            FROM services
            WHERE ?1 = 0 OR active = 1
            ORDER BY category, name
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        let option_rows: Vec<OptionRow> =
            sqlx::query_as(&format!("{SELECT_OPTIONS} ORDER BY service_id, position"))
                .fetch_all(&self.pool)
                .await?;

        let mut options: HashMap<String, Vec<ServiceOption>> = HashMap::new();
        for row in option_rows {
            options
                .entry(row.service_id.clone())
                .or_default()
                .push(row.try_into()?);
        }

        let services: Vec<Service> = rows
            .into_iter()
            .map(|row| {
                let opts = options.remove(&row.id).unwrap_or_default();
                row.into_service(opts)
            })
            .collect();

        debug!(count = services.len(), "Catalog loaded");
        Ok(services)
    }

    /// Activates or retires a service. Existing engagements keep pricing it.
    pub async fn set_service_active(&self, id: &ServiceId, active: bool) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE services
            SET active = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .bind(active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id.as_str()));
        }

        debug!(service_id = %id, active, "Service activation changed");
        Ok(())
    }

    /// Number of services in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn option(id: &str, label: &str, cents: i64, minutes: u32) -> ServiceOption {
        ServiceOption {
            id: OptionId::new(id),
            label: label.to_string(),
            description: None,
            default_duration: Minutes::new(minutes),
            unit_price: Money::from_cents(cents),
            vat_pct: Some(20.0),
            active: true,
        }
    }

    fn sofa() -> Service {
        Service {
            id: ServiceId::new("sofa"),
            name: "Canapé tissu".to_string(),
            description: Some("Shampoing injection-extraction".to_string()),
            category: ServiceCategory::Canape,
            options: vec![
                option("3p", "3 places", 8000, 90),
                option("2p", "2 places", 6000, 60),
                option("pouf", "Pouf", 1500, 15),
            ],
            active: true,
        }
    }

    async fn repo() -> CatalogRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().catalog()
    }

    #[tokio::test]
    async fn test_insert_and_get_service() {
        let repo = repo().await;
        repo.insert_service(&sofa()).await.unwrap();

        let loaded = repo.get_service(&ServiceId::new("sofa")).await.unwrap().unwrap();
        assert_eq!(loaded, sofa());
        // Option order is preserved
        assert_eq!(loaded.options[0].id, OptionId::new("3p"));
        assert_eq!(loaded.category, ServiceCategory::Canape);

        assert!(repo.get_service(&ServiceId::new("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fractional_duration_roundtrip() {
        let repo = repo().await;
        let mut service = sofa();
        service.options[2].default_duration = Minutes::from_decimal(Decimal::new(125, 1));
        repo.insert_service(&service).await.unwrap();

        let loaded = repo.get_service(&service.id).await.unwrap().unwrap();
        assert_eq!(loaded.options[2].default_duration.get(), Decimal::new(125, 1));
    }

    #[tokio::test]
    async fn test_invalid_service_is_rejected() {
        let repo = repo().await;
        let mut bad = sofa();
        bad.options.push(option("3p", "Duplicate", 100, 10));

        let err = repo.insert_service(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_service_id() {
        let repo = repo().await;
        repo.insert_service(&sofa()).await.unwrap();
        let err = repo.insert_service(&sofa()).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_list_and_deactivate() {
        let repo = repo().await;
        repo.insert_service(&sofa()).await.unwrap();

        let mut car = sofa();
        car.id = ServiceId::new("car");
        car.name = "Intérieur".into();
        car.category = ServiceCategory::Voiture;
        repo.insert_service(&car).await.unwrap();

        let all = repo.list_services(false).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|s| s.options.len() == 3));

        repo.set_service_active(&ServiceId::new("car"), false)
            .await
            .unwrap();
        let active = repo.list_services(true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, ServiceId::new("sofa"));

        let err = repo
            .set_service_active(&ServiceId::new("ghost"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}

//! # Company Repository
//!
//! Billing entities. A company's `vat_enabled` flag is the default VAT
//! policy for documents issued in its name.

use sqlx::SqlitePool;
use tracing::{debug, info};
use washgo_core::validation::validate_company_name;
use washgo_core::{Company, CompanyId, CoreError};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    vat_enabled: bool,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: CompanyId::new(row.id),
            name: row.name,
            vat_enabled: row.vat_enabled,
        }
    }
}

/// Repository for companies.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Inserts a company after validating its name.
    pub async fn insert(&self, company: &Company) -> DbResult<()> {
        validate_company_name(&company.name).map_err(CoreError::from)?;

        sqlx::query("INSERT INTO companies (id, name, vat_enabled) VALUES (?1, ?2, ?3)")
            .bind(company.id.as_str())
            .bind(company.name.trim())
            .bind(company.vat_enabled)
            .execute(&self.pool)
            .await?;

        info!(company_id = %company.id, "Company inserted");
        Ok(())
    }

    pub async fn get(&self, id: &CompanyId) -> DbResult<Option<Company>> {
        let row: Option<CompanyRow> =
            sqlx::query_as("SELECT id, name, vat_enabled FROM companies WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Company::from))
    }

    /// All companies, by name.
    pub async fn list(&self) -> DbResult<Vec<Company>> {
        let rows: Vec<CompanyRow> =
            sqlx::query_as("SELECT id, name, vat_enabled FROM companies ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Changes the default VAT policy. Engagements with their own
    /// `invoice_vat_enabled` are unaffected.
    pub async fn set_vat_enabled(&self, id: &CompanyId, enabled: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE companies SET vat_enabled = ?2 WHERE id = ?1")
            .bind(id.as_str())
            .bind(enabled)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Company", id.as_str()));
        }

        debug!(company_id = %id, enabled, "Company VAT policy changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn company(id: &str, name: &str, vat: bool) -> Company {
        Company {
            id: CompanyId::new(id),
            name: name.to_string(),
            vat_enabled: vat,
        }
    }

    #[tokio::test]
    async fn test_company_crud() {
        let repo = Database::new(DbConfig::in_memory()).await.unwrap().companies();

        repo.insert(&company("lyon", "Wash&Go Lyon", true)).await.unwrap();
        repo.insert(&company("ae", "Auto-entreprise", false)).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Auto-entreprise");

        repo.set_vat_enabled(&CompanyId::new("ae"), true).await.unwrap();
        let ae = repo.get(&CompanyId::new("ae")).await.unwrap().unwrap();
        assert!(ae.vat_enabled);

        assert!(repo.get(&CompanyId::new("none")).await.unwrap().is_none());
        assert!(matches!(
            repo.set_vat_enabled(&CompanyId::new("none"), true).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let repo = Database::new(DbConfig::in_memory()).await.unwrap().companies();
        let err = repo.insert(&company("x", "   ", true)).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }
}

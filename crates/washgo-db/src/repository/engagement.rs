//! # Engagement Repository
//!
//! Booked services, quotes and invoices.
//!
//! ## Override Hygiene
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert / update_selection                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sanitize_overrides(option_ids, overrides)  ← stale ids dropped         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  engagements.option_ids        JSON array   ["aspiration", "vitres"]    │
//! │  engagements.option_overrides  JSON object  {"vitres": {"quantity":2}}  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  get / list  ← sanitized again on read (rows written by older builds)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Document numbers are minted by
//! [`NumberingRepository`](super::numbering::NumberingRepository). An
//! engagement inserted with numbers already set (an import) raises the
//! matching counters in the same transaction, so deleting it later never
//! frees those numbers.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use washgo_core::validation::validate_additional_charge;
use washgo_core::{
    sanitize_overrides, ClientId, CompanyId, CoreError, DocumentKind, DocumentNumber, Engagement,
    EngagementId, EngagementKind, EngagementStatus, Money, OptionId, OptionOverride, ServiceId,
};

use super::numbering::raise_counter;
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EngagementRow {
    id: String,
    client_id: String,
    service_id: String,
    option_ids: String,
    option_overrides: String,
    additional_charge_cents: i64,
    status: EngagementStatus,
    kind: EngagementKind,
    invoice_number: Option<String>,
    quote_number: Option<String>,
    invoice_vat_enabled: Option<bool>,
    company_id: Option<String>,
    scheduled_at: DateTime<Utc>,
}

impl TryFrom<EngagementRow> for Engagement {
    type Error = DbError;

    fn try_from(row: EngagementRow) -> Result<Self, Self::Error> {
        let option_ids: BTreeSet<OptionId> = serde_json::from_str(&row.option_ids)?;
        let overrides: BTreeMap<OptionId, OptionOverride> =
            serde_json::from_str(&row.option_overrides)?;

        Ok(Engagement {
            id: EngagementId::new(row.id),
            client_id: ClientId::new(row.client_id),
            service_id: ServiceId::new(row.service_id),
            option_overrides: sanitize_overrides(&option_ids, Some(&overrides)),
            option_ids,
            additional_charge: Money::from_cents(row.additional_charge_cents),
            status: row.status,
            kind: row.kind,
            invoice_number: row.invoice_number,
            quote_number: row.quote_number,
            invoice_vat_enabled: row.invoice_vat_enabled,
            company_id: row.company_id.map(CompanyId::new),
            scheduled_at: row.scheduled_at,
        })
    }
}

pub(crate) const SELECT_ENGAGEMENT: &str = r#"
    SELECT id, client_id, service_id, option_ids, option_overrides,
           additional_charge_cents, status, kind, invoice_number, quote_number,
           invoice_vat_enabled, company_id, scheduled_at
    FROM engagements
"#;

fn rows_to_engagements(rows: Vec<EngagementRow>) -> DbResult<Vec<Engagement>> {
    rows.into_iter().map(Engagement::try_from).collect()
}

/// Repository for engagements.
#[derive(Debug, Clone)]
pub struct EngagementRepository {
    pool: SqlitePool,
}

impl EngagementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EngagementRepository { pool }
    }

    /// Inserts an engagement. Overrides of unselected options are dropped.
    pub async fn insert(&self, engagement: &Engagement) -> DbResult<()> {
        validate_additional_charge(engagement.additional_charge).map_err(CoreError::from)?;

        let overrides = sanitize_overrides(&engagement.option_ids, Some(&engagement.option_overrides));
        let option_ids_json = serde_json::to_string(&engagement.option_ids)?;
        let overrides_json = serde_json::to_string(&overrides)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO engagements (
                id, client_id, service_id, option_ids, option_overrides,
                additional_charge_cents, status, kind, invoice_number, quote_number,
                invoice_vat_enabled, company_id, scheduled_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(engagement.id.as_str())
        .bind(engagement.client_id.as_str())
        .bind(engagement.service_id.as_str())
        .bind(option_ids_json)
        .bind(overrides_json)
        .bind(engagement.additional_charge.cents())
        .bind(engagement.status)
        .bind(engagement.kind)
        .bind(&engagement.invoice_number)
        .bind(&engagement.quote_number)
        .bind(engagement.invoice_vat_enabled)
        .bind(engagement.company_id.as_ref().map(|id| id.as_str()))
        .bind(engagement.scheduled_at)
        .execute(&mut *tx)
        .await?;

        let stored = [
            (DocumentKind::Invoice, &engagement.invoice_number),
            (DocumentKind::Quote, &engagement.quote_number),
        ];
        for (kind, raw) in stored {
            // Free-form legacy numbers have no counter to raise
            let Some(number) = raw
                .as_deref()
                .and_then(|raw| raw.parse::<DocumentNumber>().ok())
                .filter(|n| n.kind() == kind)
            else {
                continue;
            };
            raise_counter(&mut tx, &number).await?;
            debug!(engagement_id = %engagement.id, number = %number, "Counter raised for stored number");
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            engagement_id = %engagement.id,
            options = engagement.option_ids.len(),
            "Engagement inserted"
        );
        Ok(())
    }

    pub async fn get(&self, id: &EngagementId) -> DbResult<Option<Engagement>> {
        let row: Option<EngagementRow> =
            sqlx::query_as(&format!("{SELECT_ENGAGEMENT} WHERE id = ?1"))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Engagement::try_from).transpose()
    }

    /// Like [`get`](Self::get), but a missing engagement is an error.
    pub async fn require(&self, id: &EngagementId) -> DbResult<Engagement> {
        self.get(id)
            .await?
            .ok_or_else(|| CoreError::EngagementNotFound(id.to_string()).into())
    }

    /// Every engagement, by schedule date. This is the snapshot numbering
    /// and reports work from.
    pub async fn list(&self) -> DbResult<Vec<Engagement>> {
        let rows: Vec<EngagementRow> =
            sqlx::query_as(&format!("{SELECT_ENGAGEMENT} ORDER BY scheduled_at, id"))
                .fetch_all(&self.pool)
                .await?;
        rows_to_engagements(rows)
    }

    pub async fn list_for_client(&self, client_id: &ClientId) -> DbResult<Vec<Engagement>> {
        let rows: Vec<EngagementRow> = sqlx::query_as(&format!(
            "{SELECT_ENGAGEMENT} WHERE client_id = ?1 ORDER BY scheduled_at, id"
        ))
        .bind(client_id.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows_to_engagements(rows)
    }

    /// Replaces the selected options and their overrides.
    ///
    /// Overrides are sanitized against the new selection before writing.
    /// Returns the engagement as stored.
    pub async fn update_selection(
        &self,
        id: &EngagementId,
        option_ids: impl IntoIterator<Item = OptionId>,
        overrides: &BTreeMap<OptionId, OptionOverride>,
    ) -> DbResult<Engagement> {
        let option_ids: BTreeSet<OptionId> = option_ids.into_iter().collect();
        let overrides = sanitize_overrides(&option_ids, Some(overrides));

        let result = sqlx::query(
            r#"
            UPDATE engagements
            SET option_ids = ?2,
                option_overrides = ?3,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .bind(serde_json::to_string(&option_ids)?)
        .bind(serde_json::to_string(&overrides)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::EngagementNotFound(id.to_string()).into());
        }

        debug!(engagement_id = %id, options = option_ids.len(), "Selection updated");
        self.require(id).await
    }

    pub async fn update_status(&self, id: &EngagementId, status: EngagementStatus) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE engagements
            SET status = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::EngagementNotFound(id.to_string()).into());
        }

        debug!(engagement_id = %id, ?status, "Status updated");
        Ok(())
    }

    /// Deletes an engagement. Its document numbers stay consumed.
    pub async fn delete(&self, id: &EngagementId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM engagements WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::EngagementNotFound(id.to_string()).into());
        }

        info!(engagement_id = %id, "Engagement deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use washgo_core::{Company, Minutes, MonthToken};

    fn engagement(id: &str, client: &str) -> Engagement {
        Engagement::new(
            EngagementId::new(id),
            ClientId::new(client),
            ServiceId::new("interior"),
            Utc.with_ymd_and_hms(2025, 3, 12, 14, 30, 0).unwrap(),
        )
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = db().await;
        db.companies()
            .insert(&Company {
                id: CompanyId::new("co"),
                name: "Wash&Go".into(),
                vat_enabled: false,
            })
            .await
            .unwrap();

        let mut e = engagement("e1", "alice");
        e.set_option_ids([OptionId::new("a"), OptionId::new("b")]);
        e.set_override(
            OptionId::new("a"),
            OptionOverride::with_quantity(3).duration(Minutes::new(20)),
        );
        e.set_additional_charge(Money::from_cents(1200));
        e.status = EngagementStatus::Realise;
        e.invoice_vat_enabled = Some(true);
        e.company_id = Some(CompanyId::new("co"));

        let repo = db.engagements();
        repo.insert(&e).await.unwrap();

        let loaded = repo.get(&EngagementId::new("e1")).await.unwrap().unwrap();
        assert_eq!(loaded, e);
    }

    #[tokio::test]
    async fn test_insert_drops_stale_overrides() {
        let repo = db().await.engagements();

        let mut e = engagement("e1", "alice");
        e.set_option_ids([OptionId::new("a")]);
        // Bypass the setters to simulate a stale form payload
        e.option_overrides
            .insert(OptionId::new("gone"), OptionOverride::with_quantity(4));
        repo.insert(&e).await.unwrap();

        let loaded = repo.require(&EngagementId::new("e1")).await.unwrap();
        assert!(loaded.option_overrides.is_empty());
    }

    #[tokio::test]
    async fn test_negative_surcharge_is_rejected() {
        let repo = db().await.engagements();
        let mut e = engagement("e1", "alice");
        e.additional_charge = Money::from_cents(-1);
        assert!(matches!(
            repo.insert(&e).await,
            Err(DbError::Core(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_selection_resanitizes() {
        let repo = db().await.engagements();
        let mut e = engagement("e1", "alice");
        e.set_option_ids([OptionId::new("a"), OptionId::new("b")]);
        repo.insert(&e).await.unwrap();

        let mut overrides = BTreeMap::new();
        overrides.insert(OptionId::new("a"), OptionOverride::with_quantity(2));
        overrides.insert(OptionId::new("b"), OptionOverride::with_quantity(0));

        let updated = repo
            .update_selection(&EngagementId::new("e1"), [OptionId::new("b")], &overrides)
            .await
            .unwrap();

        assert_eq!(updated.option_ids.len(), 1);
        assert_eq!(updated.option_overrides.len(), 1);
        assert_eq!(updated.option_overrides[&OptionId::new("b")].quantity, Decimal::ONE);

        let missing = repo
            .update_selection(&EngagementId::new("zz"), [], &BTreeMap::new())
            .await;
        assert!(matches!(
            missing,
            Err(DbError::Core(CoreError::EngagementNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_status_and_delete() {
        let repo = db().await.engagements();
        repo.insert(&engagement("e1", "alice")).await.unwrap();
        repo.insert(&engagement("e2", "bob")).await.unwrap();
        repo.insert(&engagement("e3", "alice")).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 3);
        let alice = repo.list_for_client(&ClientId::new("alice")).await.unwrap();
        assert_eq!(alice.len(), 2);

        repo.update_status(&EngagementId::new("e2"), EngagementStatus::Annule)
            .await
            .unwrap();
        let e2 = repo.require(&EngagementId::new("e2")).await.unwrap();
        assert_eq!(e2.status, EngagementStatus::Annule);

        repo.delete(&EngagementId::new("e2")).await.unwrap();
        assert!(repo.get(&EngagementId::new("e2")).await.unwrap().is_none());
        assert!(repo.delete(&EngagementId::new("e2")).await.is_err());
    }

    #[tokio::test]
    async fn test_imported_number_is_not_reissued_after_delete() {
        let db = db().await;
        let repo = db.engagements();
        let march = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        let mut imported = engagement("imported", "alice");
        imported.invoice_number = Some("FAC-202503-0001".into());
        imported.kind = EngagementKind::Facture;
        repo.insert(&imported).await.unwrap();
        repo.delete(&imported.id).await.unwrap();

        repo.insert(&engagement("fresh", "bob")).await.unwrap();
        let number = db
            .numbering()
            .mint(&EngagementId::new("fresh"), DocumentKind::Invoice, march)
            .await
            .unwrap();
        assert_eq!(number, "FAC-202503-0002");
    }

    #[tokio::test]
    async fn test_insert_with_free_form_number_leaves_counters_alone() {
        let db = db().await;
        let mut legacy = engagement("legacy", "alice");
        legacy.quote_number = Some("DEVIS 12".into());
        db.engagements().insert(&legacy).await.unwrap();

        let march = MonthToken::new(2025, 3).unwrap();
        assert_eq!(db.numbering().last_issued(DocumentKind::Quote, march).await.unwrap(), None);
    }
}

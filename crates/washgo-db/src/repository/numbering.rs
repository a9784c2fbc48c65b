//! # Numbering Repository
//!
//! Persistent, race-safe minting of `FAC-YYYYMM-NNNN` / `DEV-YYYYMM-NNNN`.
//!
//! ## Mint Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   1. upsert document_counters(kind, month)  ← takes the write lock      │
//! │   2. engagement already numbered?  → return it unchanged                │
//! │   3. next = max(last_seq, highest stored number of the month) + 1       │
//! │   4. next > 9999?                  → SequenceExhausted, rollback        │
//! │   5. document_counters.last_seq = next                                  │
//! │   6. engagements.{invoice,quote}_number = number, kind promoted         │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 1 is a write, so two concurrent mints queue on SQLite's write lock
//! (see the busy timeout in [`DbConfig`](crate::pool::DbConfig)) instead of
//! both reading the same counter. The partial UNIQUE indexes on the number
//! columns back this up.
//!
//! The counter only moves forward: deleting an engagement never frees its
//! number. Stored numbers are also scanned so that numbers typed in by hand,
//! or imported from an older database, are never issued again.

use chrono::NaiveDate;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use washgo_core::validation::validate_document_number;
use washgo_core::{
    CoreError, DocumentKind, DocumentNumber, EngagementId, EngagementKind, MonthToken,
};

use crate::error::{DbError, DbResult};

fn number_column(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Invoice => "invoice_number",
        DocumentKind::Quote => "quote_number",
    }
}

/// Repository for document numbers.
#[derive(Debug, Clone)]
pub struct NumberingRepository {
    pool: SqlitePool,
}

impl NumberingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        NumberingRepository { pool }
    }

    /// Assigns the next number of `kind` for the month of `reference` to the
    /// engagement, and promotes its kind.
    ///
    /// Idempotent: an engagement that already holds a number of this kind
    /// gets it back and nothing is written.
    pub async fn mint(
        &self,
        engagement_id: &EngagementId,
        kind: DocumentKind,
        reference: NaiveDate,
    ) -> DbResult<String> {
        let month = MonthToken::from_date(reference)?;
        let column = number_column(kind);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        touch_counter(&mut tx, kind, month).await?;

        let current: Option<(Option<String>, EngagementKind)> =
            sqlx::query_as(&format!("SELECT {column}, kind FROM engagements WHERE id = ?1"))
                .bind(engagement_id.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let Some((existing, current_kind)) = current else {
            return Err(CoreError::EngagementNotFound(engagement_id.to_string()).into());
        };

        if let Some(number) = existing {
            debug!(engagement_id = %engagement_id, %number, "Engagement already numbered");
            return Ok(number);
        }

        let last = next_sequence_floor(&mut tx, kind, month).await?;
        let number = DocumentNumber::new(kind, month, u32::from(last) + 1)?;
        let formatted = number.to_string();

        sqlx::query("UPDATE document_counters SET last_seq = ?3 WHERE kind = ?1 AND month = ?2")
            .bind(kind.as_str())
            .bind(month.to_string())
            .bind(i64::from(number.sequence()))
            .execute(&mut *tx)
            .await?;

        let promoted = current_kind.max(EngagementKind::from(kind));
        sqlx::query(&format!(
            r#"
            UPDATE engagements
            SET {column} = ?2, kind = ?3, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?1 AND {column} IS NULL
            "#
        ))
        .bind(engagement_id.as_str())
        .bind(&formatted)
        .bind(promoted)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            engagement_id = %engagement_id,
            number = %formatted,
            kind = ?promoted,
            "Document number minted"
        );
        Ok(formatted)
    }

    /// The number [`mint`](Self::mint) would hand out now, without
    /// reserving it.
    pub async fn peek_next(&self, kind: DocumentKind, reference: NaiveDate) -> DbResult<String> {
        let month = MonthToken::from_date(reference)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let last = next_sequence_floor(&mut tx, kind, month).await?;
        let number = DocumentNumber::new(kind, month, u32::from(last) + 1)?;
        Ok(number.to_string())
    }

    /// Last sequence issued for `kind` in `month`, if any.
    pub async fn last_issued(&self, kind: DocumentKind, month: MonthToken) -> DbResult<Option<u16>> {
        let last: Option<i64> = sqlx::query_scalar(
            "SELECT last_seq FROM document_counters WHERE kind = ?1 AND month = ?2",
        )
        .bind(kind.as_str())
        .bind(month.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(last.and_then(|seq| u16::try_from(seq).ok()).filter(|seq| *seq > 0))
    }

    /// Administrative override: replaces the engagement's number of `kind`.
    ///
    /// The new value must be well formed and unused. The month counter is
    /// raised to it so that later mints continue after it.
    pub async fn override_number(
        &self,
        engagement_id: &EngagementId,
        kind: DocumentKind,
        number: &str,
    ) -> DbResult<String> {
        let parsed = validate_document_number(kind, number).map_err(CoreError::from)?;
        let formatted = parsed.to_string();
        let column = number_column(kind);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(&format!(
            r#"
            UPDATE engagements
            SET {column} = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?1
            "#
        ))
        .bind(engagement_id.as_str())
        .bind(&formatted)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                DbError::duplicate(column, &formatted)
            } else {
                e
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(CoreError::EngagementNotFound(engagement_id.to_string()).into());
        }

        raise_counter(&mut tx, &parsed).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        warn!(
            engagement_id = %engagement_id,
            number = %formatted,
            "Document number overridden"
        );
        Ok(formatted)
    }
}

/// Moves the counter of `number`'s (kind, month) up to its sequence, so the
/// number is never minted again even once its engagement is deleted.
pub(super) async fn raise_counter(
    tx: &mut Transaction<'_, Sqlite>,
    number: &DocumentNumber,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO document_counters (kind, month, last_seq)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (kind, month) DO UPDATE SET last_seq = MAX(last_seq, excluded.last_seq)
        "#,
    )
    .bind(number.kind().as_str())
    .bind(number.month().to_string())
    .bind(i64::from(number.sequence()))
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Creates the counter row if missing. As a write, it also makes the
/// transaction take SQLite's write lock before anything is read.
async fn touch_counter(
    tx: &mut Transaction<'_, Sqlite>,
    kind: DocumentKind,
    month: MonthToken,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO document_counters (kind, month, last_seq)
        VALUES (?1, ?2, 0)
        ON CONFLICT (kind, month) DO UPDATE SET last_seq = last_seq
        "#,
    )
    .bind(kind.as_str())
    .bind(month.to_string())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Highest sequence already taken for `(kind, month)`: the counter or any
/// stored number, whichever is higher.
async fn next_sequence_floor(
    tx: &mut Transaction<'_, Sqlite>,
    kind: DocumentKind,
    month: MonthToken,
) -> DbResult<u16> {
    let counter: Option<i64> = sqlx::query_scalar(
        "SELECT last_seq FROM document_counters WHERE kind = ?1 AND month = ?2",
    )
    .bind(kind.as_str())
    .bind(month.to_string())
    .fetch_optional(&mut **tx)
    .await?;

    let column = number_column(kind);
    let stored: Vec<String> = sqlx::query_scalar(&format!(
        "SELECT {column} FROM engagements WHERE {column} LIKE ?1"
    ))
    .bind(format!("{}-{}-%", kind.prefix(), month))
    .fetch_all(&mut **tx)
    .await?;

    let highest_stored = stored
        .iter()
        .filter_map(|raw| raw.parse::<DocumentNumber>().ok())
        .filter(|n| n.kind() == kind && n.month() == month)
        .map(|n| n.sequence())
        .max()
        .unwrap_or(0);

    let counter = counter
        .and_then(|seq| u16::try_from(seq).ok())
        .unwrap_or(0);

    Ok(counter.max(highest_stored))
}

// =============================================================================
// Unit Tests
// =============================================================================

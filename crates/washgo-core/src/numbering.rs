//! # Document Numbering
//!
//! Month-scoped sequential numbers for invoices and quotes.
//!
//! ## Number Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FAC-202503-0007                                    │
//! │                      ─┬─ ───┬── ─┬──                                    │
//! │                       │     │    └── sequence, 4 digits, 0001..9999     │
//! │                       │     └─────── month token YYYYMM                 │
//! │                       └───────────── FAC (invoice) / DEV (quote)        │
//! │                                                                         │
//! │  Sequence resets to 0001 every month, independently per kind.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Minting Paths
//! - [`next_document_number`]: pure scan over an engagement snapshot. Only
//!   correct when callers serialize themselves.
//! - [`NumberingLedger`]: in-process, lock-protected, never reissues a
//!   number even if the engagement holding it was deleted.
//!
//! The persistent path lives in `washgo-db` (`NumberingRepository::mint`).

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Engagement, EngagementId, EngagementKind};

/// Highest sequence a month can hold for one kind.
pub const MAX_SEQUENCE: u16 = 9999;

/// Last year a `YYYYMM` token can hold.
pub const MAX_YEAR: i32 = 9999;

// =============================================================================
// Document Kind
// =============================================================================

/// The two kinds of numbered commercial documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DocumentKind {
    Invoice,
    Quote,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Invoice, DocumentKind::Quote];

    /// Prefix printed in front of the number.
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "FAC",
            DocumentKind::Quote => "DEV",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "FAC" => Some(DocumentKind::Invoice),
            "DEV" => Some(DocumentKind::Quote),
            _ => None,
        }
    }

    /// Stable lowercase key, used as the counter key in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Quote => "quote",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Month Token
// =============================================================================

/// A calendar month, printed `YYYYMM`.
///
/// Years are limited to 0000-9999 so the token is always six digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthToken {
    year: i32,
    month: u32,
}

impl MonthToken {
    /// Creates a token. `month` is 1-based.
    ///
    /// ## Errors
    /// [`CoreError::MonthOutOfRange`] for a year outside 0000-9999 or a month
    /// outside 1-12.
    pub fn new(year: i32, month: u32) -> CoreResult<Self> {
        if !(0..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(CoreError::MonthOutOfRange { year, month });
        }
        Ok(MonthToken { year, month })
    }

    /// The month `date` falls in.
    pub fn from_date(date: NaiveDate) -> CoreResult<Self> {
        MonthToken::new(date.year(), date.month())
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for MonthToken {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidDocumentNumber(s.to_string());
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[4..].parse().map_err(|_| invalid())?;
        MonthToken::new(year, month).map_err(|_| invalid())
    }
}

// =============================================================================
// Document Number
// =============================================================================

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(FAC|DEV)-(\d{6})-(\d{4})$").expect("document number pattern is valid")
});

/// A parsed `{PREFIX}-{YYYYMM}-{SEQ}` number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentNumber {
    kind: DocumentKind,
    month: MonthToken,
    sequence: u16,
}

impl DocumentNumber {
    /// Builds a number, refusing sequences past [`MAX_SEQUENCE`].
    pub fn new(kind: DocumentKind, month: MonthToken, sequence: u32) -> CoreResult<Self> {
        if sequence > MAX_SEQUENCE as u32 {
            return Err(CoreError::SequenceExhausted { kind, month });
        }
        Ok(DocumentNumber {
            kind,
            month,
            sequence: sequence as u16,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn month(&self) -> MonthToken {
        self.month
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// The number following this one in the same month.
    pub fn next(&self) -> CoreResult<Self> {
        DocumentNumber::new(self.kind, self.month, self.sequence as u32 + 1)
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:04}",
            self.kind.prefix(),
            self.month,
            self.sequence
        )
    }
}

impl FromStr for DocumentNumber {
    type Err = CoreError;

    /// Parses a stored number. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || CoreError::InvalidDocumentNumber(s.to_string());

        let captures = NUMBER_PATTERN.captures(trimmed).ok_or_else(invalid)?;
        let kind = DocumentKind::from_prefix(&captures[1]).ok_or_else(invalid)?;
        let month: MonthToken = captures[2].parse().map_err(|_| invalid())?;
        let sequence: u16 = captures[3].parse().map_err(|_| invalid())?;

        Ok(DocumentNumber {
            kind,
            month,
            sequence,
        })
    }
}

// =============================================================================
// Snapshot Minting
// =============================================================================

/// Parses every well-formed number of `kind` held by the engagements.
///
/// Malformed legacy values (`INV-2021-01`, empty strings) are skipped.
fn parsed_numbers(
    kind: DocumentKind,
    engagements: &[Engagement],
) -> impl Iterator<Item = DocumentNumber> + '_ {
    engagements
        .iter()
        .filter_map(move |engagement| engagement.document_number(kind))
        .filter_map(|raw| raw.parse::<DocumentNumber>().ok())
        .filter(move |number| number.kind == kind)
}

/// Highest sequence already used for `(kind, month)`, 0 when none.
pub fn highest_sequence(kind: DocumentKind, month: MonthToken, engagements: &[Engagement]) -> u16 {
    parsed_numbers(kind, engagements)
        .filter(|number| number.month == month)
        .map(|number| number.sequence)
        .max()
        .unwrap_or(0)
}

/// Computes the next number of `kind` for the month of `reference`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use washgo_core::numbering::{next_document_number, DocumentKind};
///
/// let march = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
/// let number = next_document_number(DocumentKind::Invoice, &[], march).unwrap();
/// assert_eq!(number.to_string(), "FAC-202503-0001");
/// ```
///
/// ## Errors
/// [`CoreError::SequenceExhausted`] once `9999` is taken.
pub fn next_document_number(
    kind: DocumentKind,
    engagements: &[Engagement],
    reference: NaiveDate,
) -> CoreResult<DocumentNumber> {
    let month = MonthToken::from_date(reference)?;
    let highest = highest_sequence(kind, month, engagements);
    DocumentNumber::new(kind, month, highest as u32 + 1)
}

/// Stores a freshly minted number on an engagement, unless it already has one.
///
/// Returns the engagement's number of that kind, old or new. The engagement
/// is promoted to `kind` (a service becomes a quote, a quote an invoice) but
/// never demoted.
pub fn assign_document_number(
    engagement: &mut Engagement,
    kind: DocumentKind,
    engagements: &[Engagement],
    reference: NaiveDate,
) -> CoreResult<String> {
    if let Some(existing) = engagement.document_number(kind) {
        return Ok(existing.to_string());
    }
    let number = next_document_number(kind, engagements, reference)?;
    Ok(store_number(engagement, number))
}

fn store_number(engagement: &mut Engagement, number: DocumentNumber) -> String {
    let rendered = number.to_string();
    match number.kind {
        DocumentKind::Invoice => engagement.invoice_number = Some(rendered.clone()),
        DocumentKind::Quote => engagement.quote_number = Some(rendered.clone()),
    }
    engagement.kind = engagement.kind.max(EngagementKind::from(number.kind));
    rendered
}

// =============================================================================
// Display Numbers
// =============================================================================

fn legacy_prefix(kind: EngagementKind) -> &'static str {
    match kind {
        EngagementKind::Facture => "FAC",
        EngagementKind::Devis => "DEV",
        EngagementKind::Service => "SRV",
    }
}

/// Display-only number for engagements that never received a minted one.
///
/// Built from the digits of the id: `eng-42` → `SRV-0042`. An id without
/// digits is upper-cased instead: `abc` → `SRV-ABC`. Never persisted.
pub fn legacy_document_number(id: &EngagementId, kind: EngagementKind) -> String {
    let prefix = legacy_prefix(kind);
    let digits: String = id.as_str().chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return format!("{}-{}", prefix, id.as_str().to_uppercase());
    }
    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };
    format!("{}-{:0>4}", prefix, significant)
}

/// The number shown for an engagement in lists and on documents.
pub fn display_document_number(engagement: &Engagement) -> String {
    let stored = match engagement.kind {
        EngagementKind::Facture => engagement.invoice_number.as_deref(),
        // A service converted back from a quote keeps showing the quote number
        EngagementKind::Devis | EngagementKind::Service => engagement.quote_number.as_deref(),
    };
    match stored {
        Some(number) => number.to_string(),
        None => legacy_document_number(&engagement.id, engagement.kind),
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// In-process numbering authority.
///
/// Keeps the last issued sequence per `(kind, month)` behind a mutex, so
/// concurrent callers get distinct, strictly increasing numbers. The ledger
/// only moves forward: deleting an engagement does not free its number.
///
/// ## Usage
/// ```rust
/// use chrono::NaiveDate;
/// use washgo_core::numbering::{DocumentKind, NumberingLedger};
///
/// let ledger = NumberingLedger::from_engagements(&[]);
/// let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let a = ledger.mint(DocumentKind::Quote, day).unwrap();
/// let b = ledger.mint(DocumentKind::Quote, day).unwrap();
/// assert_eq!(a.to_string(), "DEV-202503-0001");
/// assert_eq!(b.to_string(), "DEV-202503-0002");
/// ```
#[derive(Debug, Default)]
pub struct NumberingLedger {
    issued: Mutex<HashMap<(DocumentKind, MonthToken), u16>>,
}

impl NumberingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the ledger with every well-formed number in the snapshot.
    pub fn from_engagements(engagements: &[Engagement]) -> Self {
        let ledger = NumberingLedger::new();
        for kind in DocumentKind::ALL {
            for number in parsed_numbers(kind, engagements) {
                ledger.observe(&number);
            }
        }
        ledger
    }

    /// Raises the floor for the number's month so it is never issued again.
    pub fn observe(&self, number: &DocumentNumber) {
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        let last = issued.entry((number.kind, number.month)).or_insert(0);
        *last = (*last).max(number.sequence);
    }

    /// Last sequence issued for `(kind, month)`.
    pub fn last_issued(&self, kind: DocumentKind, month: MonthToken) -> Option<u16> {
        let issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        issued.get(&(kind, month)).copied()
    }

    /// Issues the next number for the month of `reference`.
    pub fn mint(&self, kind: DocumentKind, reference: NaiveDate) -> CoreResult<DocumentNumber> {
        let month = MonthToken::from_date(reference)?;
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        let last = issued.entry((kind, month)).or_insert(0);

        let number = DocumentNumber::new(kind, month, *last as u32 + 1)?;
        *last = number.sequence;

        tracing::debug!(%number, "minted document number");
        Ok(number)
    }

    /// Ledger counterpart of [`assign_document_number`].
    pub fn assign(
        &self,
        engagement: &mut Engagement,
        kind: DocumentKind,
        reference: NaiveDate,
    ) -> CoreResult<String> {
        if let Some(existing) = engagement.document_number(kind) {
            return Ok(existing.to_string());
        }
        let number = self.mint(kind, reference)?;
        Ok(store_number(engagement, number))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientId, ServiceId};
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engagement(id: &str) -> Engagement {
        Engagement::new(
            EngagementId::new(id),
            ClientId::new("client"),
            ServiceId::new("svc"),
            Utc::now(),
        )
    }

    fn invoiced(id: &str, number: &str) -> Engagement {
        let mut e = engagement(id);
        e.invoice_number = Some(number.to_string());
        e.kind = EngagementKind::Facture;
        e
    }

    #[test]
    fn test_parse_and_display() {
        let number: DocumentNumber = "  FAC-202503-0007 ".parse().unwrap();
        assert_eq!(number.kind(), DocumentKind::Invoice);
        assert_eq!(number.month(), MonthToken::new(2025, 3).unwrap());
        assert_eq!(number.sequence(), 7);
        assert_eq!(number.to_string(), "FAC-202503-0007");

        assert!("INV-2021-01".parse::<DocumentNumber>().is_err());
        assert!("FAC-202513-0001".parse::<DocumentNumber>().is_err());
        assert!("FAC-202503-00001".parse::<DocumentNumber>().is_err());
        assert!("fac-202503-0001".parse::<DocumentNumber>().is_err());
    }

    #[test]
    fn test_month_token_stays_six_digits() {
        assert_eq!(MonthToken::new(9999, 12).unwrap().to_string(), "999912");
        assert_eq!(MonthToken::new(812, 7).unwrap().to_string(), "081207");

        for (year, month) in [(10_000, 1), (-1, 6), (2025, 0), (2025, 13)] {
            assert!(matches!(
                MonthToken::new(year, month),
                Err(CoreError::MonthOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_year_past_9999_is_refused() {
        let far = date(10_000, 1, 15);
        assert!(matches!(
            next_document_number(DocumentKind::Invoice, &[], far),
            Err(CoreError::MonthOutOfRange { year: 10_000, month: 1 })
        ));
        assert!(NumberingLedger::new().mint(DocumentKind::Quote, far).is_err());

        let mut e = engagement("e1");
        assert!(assign_document_number(&mut e, DocumentKind::Invoice, &[], far).is_err());
        assert_eq!(e.invoice_number, None);
    }

    #[test]
    fn test_monthly_sequence_and_reset() {
        let mut data = Vec::new();

        let first = next_document_number(DocumentKind::Invoice, &data, date(2025, 3, 2)).unwrap();
        assert_eq!(first.to_string(), "FAC-202503-0001");
        data.push(invoiced("1", &first.to_string()));

        let second = next_document_number(DocumentKind::Invoice, &data, date(2025, 3, 28)).unwrap();
        assert_eq!(second.to_string(), "FAC-202503-0002");
        data.push(invoiced("2", &second.to_string()));

        let april = next_document_number(DocumentKind::Invoice, &data, date(2025, 4, 1)).unwrap();
        assert_eq!(april.to_string(), "FAC-202504-0001");
    }

    #[test]
    fn test_malformed_numbers_are_ignored() {
        let data = vec![
            invoiced("1", "FAC-202503-0007"),
            invoiced("2", "INV-2021-01"),
            invoiced("3", ""),
        ];
        let next = next_document_number(DocumentKind::Invoice, &data, date(2025, 3, 10)).unwrap();
        assert_eq!(next.to_string(), "FAC-202503-0008");
    }

    #[test]
    fn test_kinds_are_independent() {
        let data = vec![invoiced("1", "FAC-202503-0004")];
        let quote = next_document_number(DocumentKind::Quote, &data, date(2025, 3, 10)).unwrap();
        assert_eq!(quote.to_string(), "DEV-202503-0001");
    }

    #[test]
    fn test_sequence_exhaustion_fails_loudly() {
        let data = vec![invoiced("1", "FAC-202503-9999")];
        let err = next_document_number(DocumentKind::Invoice, &data, date(2025, 3, 10)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SequenceExhausted {
                kind: DocumentKind::Invoice,
                ..
            }
        ));

        // The next month is unaffected
        let next = next_document_number(DocumentKind::Invoice, &data, date(2025, 4, 1)).unwrap();
        assert_eq!(next.sequence(), 1);
    }

    #[test]
    fn test_successive_mints_strictly_increase() {
        let mut data: Vec<Engagement> = Vec::new();
        let mut previous = 0;
        for i in 0..25 {
            let number = next_document_number(DocumentKind::Quote, &data, date(2025, 6, 15)).unwrap();
            assert!(number.sequence() > previous);
            previous = number.sequence();
            let mut e = engagement(&i.to_string());
            e.quote_number = Some(number.to_string());
            data.push(e);
        }
        assert_eq!(previous, 25);
    }

    #[test]
    fn test_assign_is_idempotent_and_promotes() {
        let mut e = engagement("42");
        let number = assign_document_number(&mut e, DocumentKind::Quote, &[], date(2025, 3, 1)).unwrap();
        assert_eq!(number, "DEV-202503-0001");
        assert_eq!(e.kind, EngagementKind::Devis);

        // Another call, even with a snapshot that would yield a different value
        let snapshot = vec![invoiced("9", "FAC-202503-0003"), {
            let mut other = engagement("8");
            other.quote_number = Some("DEV-202503-0010".into());
            other
        }];
        let again = assign_document_number(&mut e, DocumentKind::Quote, &snapshot, date(2025, 3, 2)).unwrap();
        assert_eq!(again, "DEV-202503-0001");
        assert_eq!(e.quote_number.as_deref(), Some("DEV-202503-0001"));

        // Converting to invoice keeps the quote number
        let invoice = assign_document_number(&mut e, DocumentKind::Invoice, &snapshot, date(2025, 3, 2)).unwrap();
        assert_eq!(invoice, "FAC-202503-0004");
        assert_eq!(e.kind, EngagementKind::Facture);
        assert_eq!(e.quote_number.as_deref(), Some("DEV-202503-0001"));
    }

    #[test]
    fn test_invoice_number_is_immutable_except_override() {
        let mut e = engagement("1");
        let first = assign_document_number(&mut e, DocumentKind::Invoice, &[], date(2025, 3, 1)).unwrap();

        e.toggle_option("opt".into());
        e.set_additional_charge(crate::money::Money::from_cents(500));
        let ledger = NumberingLedger::new();
        ledger.assign(&mut e, DocumentKind::Invoice, date(2025, 5, 1)).unwrap();
        assign_document_number(&mut e, DocumentKind::Quote, &[], date(2025, 5, 1)).unwrap();
        assert_eq!(e.invoice_number.as_deref(), Some(first.as_str()));
        // A quote minted after invoicing does not demote the engagement
        assert_eq!(e.kind, EngagementKind::Facture);

        e.override_document_number(DocumentKind::Invoice, "FAC-202503-0100");
        assert_eq!(e.invoice_number.as_deref(), Some("FAC-202503-0100"));
    }

    #[test]
    fn test_legacy_numbers() {
        assert_eq!(
            legacy_document_number(&EngagementId::new("eng-42"), EngagementKind::Service),
            "SRV-0042"
        );
        assert_eq!(
            legacy_document_number(&EngagementId::new("0007"), EngagementKind::Devis),
            "DEV-0007"
        );
        assert_eq!(
            legacy_document_number(&EngagementId::new("e123456"), EngagementKind::Facture),
            "FAC-123456"
        );
        assert_eq!(
            legacy_document_number(&EngagementId::new("abc"), EngagementKind::Service),
            "SRV-ABC"
        );
        assert_eq!(
            legacy_document_number(&EngagementId::new("x000"), EngagementKind::Service),
            "SRV-0000"
        );
    }

    #[test]
    fn test_display_number() {
        let mut e = engagement("e12");
        assert_eq!(display_document_number(&e), "SRV-0012");

        e.quote_number = Some("DEV-202503-0002".into());
        assert_eq!(display_document_number(&e), "DEV-202503-0002");

        e.kind = EngagementKind::Facture;
        assert_eq!(display_document_number(&e), "FAC-0012");

        e.invoice_number = Some("FAC-202503-0001".into());
        assert_eq!(display_document_number(&e), "FAC-202503-0001");
    }

    #[test]
    fn test_ledger_never_reissues_deleted_numbers() {
        let data = vec![invoiced("1", "FAC-202503-0001"), invoiced("2", "FAC-202503-0002")];
        let ledger = NumberingLedger::from_engagements(&data);
        assert_eq!(
            ledger.last_issued(DocumentKind::Invoice, MonthToken::new(2025, 3).unwrap()),
            Some(2)
        );

        // Engagement 2 is deleted; the snapshot scan would hand 0002 out again
        let remaining = &data[..1];
        let scanned = next_document_number(DocumentKind::Invoice, remaining, date(2025, 3, 9)).unwrap();
        assert_eq!(scanned.sequence(), 2);

        let minted = ledger.mint(DocumentKind::Invoice, date(2025, 3, 9)).unwrap();
        assert_eq!(minted.to_string(), "FAC-202503-0003");
    }

    #[test]
    fn test_ledger_exhaustion() {
        let ledger = NumberingLedger::new();
        ledger.observe(&"DEV-202501-9998".parse().unwrap());
        assert!(ledger.mint(DocumentKind::Quote, date(2025, 1, 3)).is_ok());
        assert!(matches!(
            ledger.mint(DocumentKind::Quote, date(2025, 1, 3)),
            Err(CoreError::SequenceExhausted { .. })
        ));
    }

    #[test]
    fn test_concurrent_minting_yields_distinct_numbers() {
        let ledger = Arc::new(NumberingLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    (0..50)
                        .map(|_| ledger.mint(DocumentKind::Invoice, date(2025, 3, 1)).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            let numbers = handle.join().unwrap();
            // Each thread observes its own numbers in increasing order
            assert!(numbers.windows(2).all(|w| w[0].sequence() < w[1].sequence()));
            for number in numbers {
                assert!(seen.insert(number));
            }
        }
        assert_eq!(seen.len(), 400);
        assert_eq!(
            ledger.last_issued(DocumentKind::Invoice, MonthToken::new(2025, 3).unwrap()),
            Some(400)
        );
    }
}

//! # Domain Types
//!
//! Core domain types used throughout Wash&Go.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Service      │   │   Engagement    │   │    Company      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  category       │   │  service_id     │   │  name           │       │
//! │  │  options[] ─────┼─► │  option_ids     │   │  vat_enabled    │       │
//! │  │                 │   │  overrides      │   └─────────────────┘       │
//! │  └─────────────────┘   │  invoice_number │                             │
//! │                        │  quote_number   │                             │
//! │                        └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    VatRate      │   │    Minutes      │   │ BillingSettings │       │
//! │  │  bps (u32)      │   │  u32            │   │  vat_enabled    │       │
//! │  │  2000 = 20 %    │   │  per occurrence │   │  vat_rate       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifiers
//! Every entity id is an opaque newtype over `String`. An `OptionId` cannot be
//! passed where a `ClientId` is expected, even though both are strings on the
//! wire.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::numbering::DocumentKind;
use crate::overrides::{sanitize_overrides, OptionOverride};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Generates a fresh UUID v4 identifier.
            pub fn generate() -> Self {
                $name(Uuid::new_v4().to_string())
            }

            /// Returns the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }
    };
}

string_id!(
    /// Identifies a [`ServiceOption`] inside the catalog.
    OptionId
);
string_id!(
    /// Identifies a [`Service`] in the catalog.
    ServiceId
);
string_id!(
    /// Identifies an [`Engagement`].
    EngagementId
);
string_id!(
    /// Identifies a client record (owned by the CRM side).
    ClientId
);
string_id!(
    /// Identifies a billing [`Company`].
    CompanyId
);

// =============================================================================
// Minutes
// =============================================================================

/// A duration in minutes. Fractions are kept: an override of 7.5 minutes is
/// 7.5 minutes.
///
/// Option durations are per occurrence: a quantity of 2 on an option does not
/// double its duration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Minutes(#[ts(type = "string")] Decimal);

impl Minutes {
    /// Whole minutes.
    #[inline]
    pub const fn new(minutes: u32) -> Self {
        Minutes(Decimal::from_parts(minutes, 0, 0, false, 0))
    }

    /// Any number of minutes; negative values clamp to zero.
    pub fn from_decimal(minutes: Decimal) -> Self {
        Minutes(minutes.max(Decimal::ZERO))
    }

    #[inline]
    pub const fn zero() -> Self {
        Minutes(Decimal::ZERO)
    }

    #[inline]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Splits into `(hours, minutes)` for planning displays. Seconds are
    /// dropped.
    pub fn hours_minutes(&self) -> (u64, u64) {
        let whole = self.0.trunc().to_u64().unwrap_or(u64::MAX);
        (whole / 60, whole % 60)
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0.normalize())
    }
}

impl Add for Minutes {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Minutes(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Minutes {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Minutes {
    fn sum<I: Iterator<Item = Minutes>>(iter: I) -> Self {
        iter.fold(Minutes::zero(), Add::add)
    }
}

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01 %. French rates (20 %, 10 %, 5.5 %) are all exact in
/// bps, so VAT can be computed with integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatRate(u32);

impl VatRate {
    /// Creates a VAT rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        VatRate(bps)
    }

    /// Creates a VAT rate from a percentage as typed in the settings screen.
    ///
    /// Sanitized on the way in: negative values become 0, and so do NaN and
    /// infinities.
    ///
    /// ## Example
    /// ```rust
    /// use washgo_core::types::VatRate;
    ///
    /// assert_eq!(VatRate::from_percentage(20.0).bps(), 2000);
    /// assert_eq!(VatRate::from_percentage(-3.0).bps(), 0);
    /// assert_eq!(VatRate::from_percentage(f64::NAN).bps(), 0);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return VatRate(0);
        }
        VatRate((pct * 100.0).round().min(u32::MAX as f64) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero VAT rate.
    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Formats the rate for document labels ("TVA 20 %").
    ///
    /// Whole rates print without decimals, anything else keeps two.
    ///
    /// ## Example
    /// ```rust
    /// use washgo_core::types::VatRate;
    ///
    /// assert_eq!(VatRate::from_bps(2000).label(), "20");
    /// assert_eq!(VatRate::from_bps(550).label(), "5.50");
    /// ```
    pub fn label(&self) -> String {
        if self.0 % 100 == 0 {
            (self.0 / 100).to_string()
        } else {
            format!("{}.{:02}", self.0 / 100, self.0 % 100)
        }
    }
}

impl Default for VatRate {
    /// French standard rate.
    fn default() -> Self {
        VatRate::from_bps(2000)
    }
}

// =============================================================================
// Billing Settings
// =============================================================================

/// Process-wide billing defaults.
///
/// Read-only snapshot handed to the pricing functions. Loaded by the
/// application layer (see `washgo-db`'s config module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillingSettings {
    /// Default VAT policy when neither the engagement nor its company decide.
    pub vat_enabled: bool,

    /// VAT rate applied when VAT is enabled.
    pub vat_rate: VatRate,
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            vat_enabled: true,
            vat_rate: VatRate::default(),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The kind of support a service is performed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum ServiceCategory {
    Voiture,
    #[serde(rename = "Canapé")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Canapé"))]
    Canape,
    Textile,
    Autre,
}

impl ServiceCategory {
    /// All categories, in the order reports list them.
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::Voiture,
        ServiceCategory::Canape,
        ServiceCategory::Textile,
        ServiceCategory::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Voiture => "Voiture",
            ServiceCategory::Canape => "Canapé",
            ServiceCategory::Textile => "Textile",
            ServiceCategory::Autre => "Autre",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priced line item of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceOption {
    pub id: OptionId,
    pub label: String,
    pub description: Option<String>,
    /// Duration of one occurrence of this option.
    pub default_duration: Minutes,
    /// Unit price before VAT.
    pub unit_price: Money,
    /// Per-option VAT percentage, informational (documents use the global rate).
    pub vat_pct: Option<f64>,
    pub active: bool,
}

/// A named group of options ("Nettoyage intérieur", "Shampoing canapé"...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub category: ServiceCategory,
    pub options: Vec<ServiceOption>,
    pub active: bool,
}

impl Service {
    /// Looks up one of this service's options.
    pub fn option(&self, id: &OptionId) -> Option<&ServiceOption> {
        self.options.iter().find(|option| &option.id == id)
    }

    /// Keeps only the ids that still exist in this service.
    pub fn allowed_option_ids<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a OptionId>,
    ) -> BTreeSet<OptionId> {
        ids.into_iter()
            .filter(|id| self.option(id).is_some())
            .cloned()
            .collect()
    }
}

/// Finds a service in a catalog snapshot.
pub fn find_service<'a>(catalog: &'a [Service], id: &ServiceId) -> Option<&'a Service> {
    catalog.iter().find(|service| &service.id == id)
}

// =============================================================================
// Company
// =============================================================================

/// A billing entity. Documents are issued in its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Default VAT policy for this company's documents.
    pub vat_enabled: bool,
}

/// Finds a company in a snapshot.
pub fn find_company<'a>(companies: &'a [Company], id: &CompanyId) -> Option<&'a Company> {
    companies.iter().find(|company| &company.id == id)
}

// =============================================================================
// Engagement Status / Kind
// =============================================================================

/// Lifecycle status of an engagement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EngagementStatus {
    Brouillon,
    #[serde(rename = "envoyé")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "envoyé"))]
    Envoye,
    #[default]
    #[serde(rename = "planifié")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "planifié"))]
    Planifie,
    #[serde(rename = "réalisé")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "réalisé"))]
    Realise,
    #[serde(rename = "annulé")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "annulé"))]
    Annule,
}

/// What an engagement currently is, commercially.
///
/// Ordered by promotion: a service can become a quote, a quote an invoice.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EngagementKind {
    /// A booked service, no commercial document yet.
    #[default]
    Service,
    /// Promoted to a quote.
    Devis,
    /// Promoted to an invoice.
    Facture,
}

impl EngagementKind {
    /// Label printed on documents.
    pub fn label(&self) -> &'static str {
        match self {
            EngagementKind::Service => "Service",
            EngagementKind::Devis => "Devis",
            EngagementKind::Facture => "Facture",
        }
    }
}

impl From<DocumentKind> for EngagementKind {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Invoice => EngagementKind::Facture,
            DocumentKind::Quote => EngagementKind::Devis,
        }
    }
}

// =============================================================================
// Engagement
// =============================================================================

/// A booked service instance that may later become a quote or an invoice.
///
/// ## Invariants
/// - `option_overrides` keys are always a subset of `option_ids`. Every
///   method that touches `option_ids` re-runs the sanitizer.
/// - `invoice_number` / `quote_number` never change once set, except through
///   [`Engagement::override_document_number`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Engagement {
    pub id: EngagementId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    #[serde(default)]
    pub option_ids: BTreeSet<OptionId>,
    #[serde(default)]
    pub option_overrides: BTreeMap<OptionId, OptionOverride>,
    /// Flat surcharge ("frais complémentaires"), before VAT.
    pub additional_charge: Money,
    pub status: EngagementStatus,
    pub kind: EngagementKind,
    pub invoice_number: Option<String>,
    pub quote_number: Option<String>,
    /// `None` inherits the company default.
    pub invoice_vat_enabled: Option<bool>,
    pub company_id: Option<CompanyId>,
    #[ts(as = "String")]
    pub scheduled_at: DateTime<Utc>,
}

impl Engagement {
    /// Creates a planned service engagement with no options selected.
    pub fn new(
        id: EngagementId,
        client_id: ClientId,
        service_id: ServiceId,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Engagement {
            id,
            client_id,
            service_id,
            option_ids: BTreeSet::new(),
            option_overrides: BTreeMap::new(),
            additional_charge: Money::zero(),
            status: EngagementStatus::default(),
            kind: EngagementKind::default(),
            invoice_number: None,
            quote_number: None,
            invoice_vat_enabled: None,
            company_id: None,
            scheduled_at,
        }
    }

    /// Replaces the selected options and drops overrides that no longer apply.
    pub fn set_option_ids(&mut self, ids: impl IntoIterator<Item = OptionId>) {
        self.option_ids = ids.into_iter().collect();
        self.resanitize();
    }

    /// Selects or deselects one option. Returns `true` if it is now selected.
    pub fn toggle_option(&mut self, id: OptionId) -> bool {
        let selected = if self.option_ids.remove(&id) {
            false
        } else {
            self.option_ids.insert(id);
            true
        };
        self.resanitize();
        selected
    }

    /// Moves the engagement to another service.
    ///
    /// Options that do not belong to the new service are dropped along with
    /// their overrides.
    pub fn switch_service(&mut self, service: &Service) {
        self.service_id = service.id.clone();
        self.option_ids = service.allowed_option_ids(&self.option_ids);
        self.resanitize();
    }

    /// Sets the override of a selected option.
    ///
    /// Overrides for unselected options are ignored: returns `false` and leaves
    /// the map untouched.
    pub fn set_override(&mut self, id: OptionId, value: OptionOverride) -> bool {
        if !self.option_ids.contains(&id) {
            return false;
        }
        self.option_overrides.insert(id, value);
        self.resanitize();
        true
    }

    /// Sets the surcharge, clamped to zero.
    pub fn set_additional_charge(&mut self, amount: Money) {
        self.additional_charge = amount.non_negative();
    }

    /// Effective VAT flag: engagement override, then company, then settings.
    pub fn effective_vat_enabled(
        &self,
        company: Option<&Company>,
        settings: &BillingSettings,
    ) -> bool {
        self.invoice_vat_enabled
            .or_else(|| company.map(|c| c.vat_enabled))
            .unwrap_or(settings.vat_enabled)
    }

    /// The stored number of the given kind, if one has been minted.
    pub fn document_number(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Invoice => self.invoice_number.as_deref(),
            DocumentKind::Quote => self.quote_number.as_deref(),
        }
    }

    /// Administrative override of a minted number.
    ///
    /// This is the only way to change a number once set. Regular flows go
    /// through `numbering::assign_document_number`, which never overwrites.
    pub fn override_document_number(&mut self, kind: DocumentKind, number: impl Into<String>) {
        let number = Some(number.into());
        match kind {
            DocumentKind::Invoice => self.invoice_number = number,
            DocumentKind::Quote => self.quote_number = number,
        }
    }

    fn resanitize(&mut self) {
        self.option_overrides = sanitize_overrides(&self.option_ids, Some(&self.option_overrides));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn engagement() -> Engagement {
        Engagement::new(
            EngagementId::new("e1"),
            ClientId::new("c1"),
            ServiceId::new("s1"),
            Utc::now(),
        )
    }

    #[test]
    fn test_vat_rate_from_percentage() {
        assert_eq!(VatRate::from_percentage(20.0).bps(), 2000);
        assert_eq!(VatRate::from_percentage(5.5).bps(), 550);
        assert_eq!(VatRate::from_percentage(-1.0), VatRate::zero());
        assert_eq!(VatRate::from_percentage(f64::INFINITY), VatRate::zero());
    }

    #[test]
    fn test_vat_rate_label() {
        assert_eq!(VatRate::from_bps(2000).label(), "20");
        assert_eq!(VatRate::from_bps(1000).label(), "10");
        assert_eq!(VatRate::from_bps(550).label(), "5.50");
        assert_eq!(VatRate::from_bps(825).label(), "8.25");
        assert_eq!(VatRate::zero().label(), "0");
    }

    #[test]
    fn test_minutes() {
        let total: Minutes = [Minutes::new(30), Minutes::new(45)].into_iter().sum();
        assert_eq!(total, Minutes::new(75));
        assert_eq!(total.hours_minutes(), (1, 15));
        assert_eq!(total.to_string(), "75 min");

        let half = Minutes::from_decimal(Decimal::new(75, 1));
        assert_eq!((half + half).to_string(), "15 min");
        assert_eq!(half.to_string(), "7.5 min");
        assert_eq!(Minutes::from_decimal(Decimal::from(-5)), Minutes::zero());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = OptionId::new("opt-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"opt-1\"");
    }

    #[test]
    fn test_status_serializes_with_accents() {
        let json = serde_json::to_string(&EngagementStatus::Realise).unwrap();
        assert_eq!(json, "\"réalisé\"");
        let parsed: EngagementStatus = serde_json::from_str("\"annulé\"").unwrap();
        assert_eq!(parsed, EngagementStatus::Annule);
        let parsed: EngagementStatus = serde_json::from_str("\"brouillon\"").unwrap();
        assert_eq!(parsed, EngagementStatus::Brouillon);
    }

    #[test]
    fn test_category_serializes_with_accent() {
        let json = serde_json::to_string(&ServiceCategory::Canape).unwrap();
        assert_eq!(json, "\"Canapé\"");
    }

    #[test]
    fn test_defaults() {
        let e = engagement();
        assert_eq!(e.status, EngagementStatus::Planifie);
        assert_eq!(e.kind, EngagementKind::Service);
        assert!(e.invoice_number.is_none());
    }

    #[test]
    fn test_toggle_option_drops_its_override() {
        let mut e = engagement();
        let a = OptionId::new("a");
        assert!(e.toggle_option(a.clone()));
        assert!(e.set_override(a.clone(), OptionOverride::with_quantity(3)));
        assert_eq!(e.option_overrides.len(), 1);

        assert!(!e.toggle_option(a.clone()));
        assert!(e.option_overrides.is_empty());
    }

    #[test]
    fn test_set_override_on_unselected_option_is_ignored() {
        let mut e = engagement();
        assert!(!e.set_override(OptionId::new("ghost"), OptionOverride::with_quantity(2)));
        assert!(e.option_overrides.is_empty());
    }

    #[test]
    fn test_switch_service_keeps_only_known_options() {
        let mut e = engagement();
        e.set_option_ids([OptionId::new("a"), OptionId::new("b")]);
        e.set_override(OptionId::new("a"), OptionOverride::with_quantity(2));
        e.set_override(OptionId::new("b"), OptionOverride::with_quantity(2));

        let other = Service {
            id: ServiceId::new("s2"),
            name: "Canapé".into(),
            description: None,
            category: ServiceCategory::Canape,
            options: vec![ServiceOption {
                id: OptionId::new("b"),
                label: "Shampoing".into(),
                description: None,
                default_duration: Minutes::new(60),
                unit_price: Money::from_cents(5000),
                vat_pct: None,
                active: true,
            }],
            active: true,
        };

        e.switch_service(&other);
        assert_eq!(e.service_id, ServiceId::new("s2"));
        assert_eq!(e.option_ids.len(), 1);
        assert!(e.option_overrides.contains_key(&OptionId::new("b")));
        assert!(!e.option_overrides.contains_key(&OptionId::new("a")));
    }

    #[test]
    fn test_additional_charge_is_clamped() {
        let mut e = engagement();
        e.set_additional_charge(Money::from_cents(-500));
        assert_eq!(e.additional_charge, Money::zero());
    }

    #[test]
    fn test_effective_vat_enabled_precedence() {
        let settings = BillingSettings {
            vat_enabled: true,
            vat_rate: VatRate::default(),
        };
        let company = Company {
            id: CompanyId::new("co"),
            name: "Wash&Go".into(),
            vat_enabled: false,
        };
        let mut e = engagement();

        // Company beats settings
        assert!(!e.effective_vat_enabled(Some(&company), &settings));
        // Settings when no company
        assert!(e.effective_vat_enabled(None, &settings));
        // Engagement beats everything
        e.invoice_vat_enabled = Some(true);
        assert!(e.effective_vat_enabled(Some(&company), &settings));
    }

    #[test]
    fn test_engagement_json_shape() {
        let e = engagement();
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("optionOverrides").is_some());
        assert!(json.get("invoiceVatEnabled").is_some());
        assert_eq!(json["kind"], "service");
    }
}

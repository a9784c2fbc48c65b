//! # Totals Engine
//!
//! Prices an engagement from the catalog snapshot and its overrides.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Engagement Totals                                │
//! │                                                                         │
//! │  for each selected option that exists in the service:                   │
//! │      resolved = resolve_option_override(option, override)               │
//! │      price    += resolved.unit_price × resolved.quantity  (unrounded)   │
//! │      duration += resolved.duration        (quantity does not scale it)  │
//! │                                                                         │
//! │  surcharge = engagement.additional_charge                               │
//! │                                                                         │
//! │  exact     = price + surcharge                                          │
//! │  subtotal  = round(exact)                                               │
//! │  vat       = vat_enabled ? round(exact × rate) : 0                      │
//! │  total TTC = subtotal + vat                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog and engagement are passed in explicitly. Nothing here reads global
//! state, and nothing here fails: an unknown service prices at zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{ExactMoney, Money};
use crate::overrides::resolve_option_override;
use crate::types::{find_service, BillingSettings, Company, Engagement, Minutes, Service, VatRate};

// =============================================================================
// Engagement Totals
// =============================================================================

/// Pre-VAT totals of one engagement.
///
/// Fractional quantities leave fractions of a cent in `price`. They are kept
/// until [`compute_document_totals`] rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EngagementTotals {
    /// Sum of option line totals.
    pub price: ExactMoney,
    /// Sum of option durations.
    pub duration: Minutes,
    /// The engagement's flat surcharge.
    pub surcharge: Money,
}

impl EngagementTotals {
    /// `price + surcharge`, the amount VAT applies to.
    pub fn subtotal(&self) -> ExactMoney {
        self.price + ExactMoney::from(self.surcharge)
    }
}

/// Computes price, duration and surcharge of an engagement.
///
/// ## Rules
/// - Service not in the catalog: price and duration are zero
/// - Selected ids missing from the service are skipped
/// - Overrides of unselected ids are never applied
///
/// ## Example
/// ```rust
/// use washgo_core::totals::compute_engagement_totals;
/// use washgo_core::types::{ClientId, Engagement, EngagementId, ServiceId};
/// use washgo_core::money::Money;
///
/// let mut engagement = Engagement::new(
///     EngagementId::new("e1"),
///     ClientId::new("c1"),
///     ServiceId::new("unknown"),
///     chrono::Utc::now(),
/// );
/// engagement.set_additional_charge(Money::from_cents(1200));
///
/// let totals = compute_engagement_totals(&engagement, &[]);
/// assert!(totals.price.is_zero());
/// assert_eq!(totals.surcharge.cents(), 1200);
/// ```
pub fn compute_engagement_totals(engagement: &Engagement, catalog: &[Service]) -> EngagementTotals {
    let mut totals = EngagementTotals {
        surcharge: engagement.additional_charge,
        ..EngagementTotals::default()
    };

    let Some(service) = find_service(catalog, &engagement.service_id) else {
        return totals;
    };

    for id in &engagement.option_ids {
        let Some(option) = service.option(id) else {
            continue;
        };
        let resolved = resolve_option_override(option, engagement.option_overrides.get(id));
        totals.price += resolved.line_total();
        totals.duration += resolved.duration;
    }

    totals
}

// =============================================================================
// Document Totals
// =============================================================================

/// Amounts printed at the bottom of a quote or invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentTotals {
    /// Total HT.
    pub subtotal: Money,
    pub vat_amount: Money,
    /// Total TTC.
    pub total_ttc: Money,
}

/// Applies VAT to engagement totals. This is the only place pre-VAT amounts
/// are rounded to whole cents.
///
/// ## Example
/// ```rust
/// use washgo_core::money::{ExactMoney, Money};
/// use washgo_core::totals::{compute_document_totals, EngagementTotals};
/// use washgo_core::types::{Minutes, VatRate};
///
/// let totals = EngagementTotals {
///     price: ExactMoney::from_cents(3500),
///     duration: Minutes::new(75),
///     surcharge: Money::from_cents(500),
/// };
/// let doc = compute_document_totals(&totals, true, VatRate::from_bps(2000));
/// assert_eq!(doc.vat_amount.cents(), 800);
/// assert_eq!(doc.total_ttc.cents(), 4800);
/// ```
pub fn compute_document_totals(
    totals: &EngagementTotals,
    vat_enabled: bool,
    rate: VatRate,
) -> DocumentTotals {
    let exact = totals.subtotal();
    let vat_amount = if vat_enabled {
        exact.calculate_vat(rate)
    } else {
        Money::zero()
    };
    let subtotal = exact.round();

    DocumentTotals {
        subtotal,
        vat_amount,
        total_ttc: subtotal + vat_amount,
    }
}

/// Full pricing of an engagement, VAT policy resolved from the engagement,
/// its company and the billing settings.
pub fn price_engagement(
    engagement: &Engagement,
    catalog: &[Service],
    company: Option<&Company>,
    settings: &BillingSettings,
) -> DocumentTotals {
    let totals = compute_engagement_totals(engagement, catalog);
    let vat_enabled = engagement.effective_vat_enabled(company, settings);
    compute_document_totals(&totals, vat_enabled, settings.vat_rate)
}

// =============================================================================
// Unit Tests
// =============================================================================

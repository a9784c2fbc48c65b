//! # Option Overrides
//!
//! Per-engagement customization of an option's quantity, duration and price,
//! without touching the shared catalog.
//!
//! ## Override Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Override Lifecycle                                │
//! │                                                                         │
//! │  Form input (floats, may be NaN / negative / missing)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OptionOverrideInput::normalize()   ← clamp, never reject               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sanitize_overrides(option_ids, …)  ← drop unselected ids               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Engagement.option_overrides        ← persisted                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_option_override(option, …) ← effective values for totals      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is total: there is no input that produces an error.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

use crate::money::{ExactMoney, Money};
use crate::types::{Minutes, OptionId, ServiceOption};

// =============================================================================
// Override Types
// =============================================================================

/// A stored per-option override.
///
/// ## Field Semantics
/// - `quantity`: may be fractional (1.5 sessions); 0 means "not set" and
///   resolves to 1
/// - `duration`: `None` inherits the catalog duration
/// - `unit_price`: `None` inherits the catalog price; a negative value is
///   never applied (the sanitizer clamps it, the resolver ignores it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OptionOverride {
    #[serde(default)]
    #[ts(type = "string")]
    pub quantity: Decimal,
    #[serde(default)]
    pub duration: Option<Minutes>,
    #[serde(default)]
    pub unit_price: Option<Money>,
}

impl OptionOverride {
    /// Override that only changes the quantity.
    pub fn with_quantity(quantity: impl Into<Decimal>) -> Self {
        OptionOverride {
            quantity: quantity.into(),
            duration: None,
            unit_price: None,
        }
    }

    /// Sets the duration override.
    pub fn duration(mut self, duration: Minutes) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the unit price override.
    pub fn unit_price(mut self, price: Money) -> Self {
        self.unit_price = Some(price);
        self
    }

    /// Applies the clamping rules: quantity ≥ 1, price ≥ 0.
    pub fn clamped(&self) -> Self {
        OptionOverride {
            quantity: self.quantity.max(Decimal::ONE),
            duration: self.duration,
            unit_price: self.unit_price.map(|price| price.non_negative()),
        }
    }
}

impl Default for OptionOverride {
    fn default() -> Self {
        OptionOverride::with_quantity(1)
    }
}

/// An override as it arrives from a form: every field optional, every number
/// a float that may be NaN, infinite or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OptionOverrideInput {
    pub quantity: Option<f64>,
    pub duration_min: Option<f64>,
    /// Major units (euros), before VAT.
    #[serde(rename = "unitPriceHT")]
    pub unit_price_ht: Option<f64>,
}

impl OptionOverrideInput {
    /// Converts raw input to a stored override.
    ///
    /// ## Rules
    /// - quantity: missing, zero or non-finite → 1, otherwise `max(1, q)`
    /// - duration: non-finite → inherit, otherwise `max(0, d)`
    /// - price: non-finite → inherit, otherwise `max(0, price)` in cents
    ///
    /// Quantities and durations are never rounded.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use washgo_core::overrides::OptionOverrideInput;
    ///
    /// let raw = OptionOverrideInput {
    ///     quantity: Some(-4.0),
    ///     duration_min: Some(f64::NAN),
    ///     unit_price_ht: Some(-10.0),
    /// };
    /// let clean = raw.normalize();
    /// assert_eq!(clean.quantity, Decimal::ONE);
    /// assert_eq!(clean.duration, None);
    /// assert_eq!(clean.unit_price.unwrap().cents(), 0);
    /// ```
    pub fn normalize(&self) -> OptionOverride {
        let quantity = self
            .quantity
            .filter(|q| *q != 0.0)
            .and_then(finite_decimal)
            .map_or(Decimal::ONE, |q| q.max(Decimal::ONE));

        let duration = self
            .duration_min
            .and_then(finite_decimal)
            .map(Minutes::from_decimal);

        let unit_price = self
            .unit_price_ht
            .and_then(Money::from_major)
            .map(|price| price.non_negative());

        OptionOverride {
            quantity,
            duration,
            unit_price,
        }
    }
}

/// `None` for NaN and infinities. Magnitudes beyond what a [`Decimal`] holds
/// saturate.
fn finite_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or(Some(if value < 0.0 { Decimal::MIN } else { Decimal::MAX }))
}

// =============================================================================
// Sanitizer
// =============================================================================

/// Drops overrides of unselected options and clamps the rest.
///
/// Runs whenever an engagement's selected options change: toggling an
/// option, switching service or category, loading a draft.
///
/// ## Laws
/// - Closure: every key of the result is in `option_ids`
/// - Idempotence: `sanitize(ids, sanitize(ids, x)) == sanitize(ids, x)`
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use std::collections::{BTreeMap, BTreeSet};
/// use washgo_core::overrides::{sanitize_overrides, OptionOverride};
/// use washgo_core::types::OptionId;
///
/// let ids: BTreeSet<OptionId> = [OptionId::new("a")].into_iter().collect();
/// let mut overrides = BTreeMap::new();
/// overrides.insert(OptionId::new("a"), OptionOverride::with_quantity(0));
/// overrides.insert(OptionId::new("gone"), OptionOverride::with_quantity(5));
///
/// let clean = sanitize_overrides(&ids, Some(&overrides));
/// assert_eq!(clean.len(), 1);
/// assert_eq!(clean[&OptionId::new("a")].quantity, Decimal::ONE);
/// ```
pub fn sanitize_overrides(
    option_ids: &BTreeSet<OptionId>,
    overrides: Option<&BTreeMap<OptionId, OptionOverride>>,
) -> BTreeMap<OptionId, OptionOverride> {
    let Some(overrides) = overrides else {
        return BTreeMap::new();
    };

    overrides
        .iter()
        .filter(|(id, _)| option_ids.contains(*id))
        .map(|(id, value)| (id.clone(), value.clamped()))
        .collect()
}

/// Normalizes raw form overrides, then sanitizes them against the selection.
pub fn sanitize_override_inputs(
    option_ids: &BTreeSet<OptionId>,
    inputs: Option<&BTreeMap<OptionId, OptionOverrideInput>>,
) -> BTreeMap<OptionId, OptionOverride> {
    let Some(inputs) = inputs else {
        return BTreeMap::new();
    };

    let normalized: BTreeMap<OptionId, OptionOverride> = inputs
        .iter()
        .filter(|(id, _)| option_ids.contains(*id))
        .map(|(id, input)| (id.clone(), input.normalize()))
        .collect();

    sanitize_overrides(option_ids, Some(&normalized))
}

// =============================================================================
// Resolution
// =============================================================================

/// Effective values of one option once its override is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ResolvedOption {
    #[ts(type = "string")]
    pub quantity: Decimal,
    pub duration: Minutes,
    pub unit_price: Money,
}

impl ResolvedOption {
    /// `unit_price × quantity`, unrounded.
    pub fn line_total(&self) -> ExactMoney {
        self.unit_price.times(self.quantity)
    }
}

/// Resolves an option against its (possibly missing) override.
///
/// ## Rules
/// - quantity: override if `> 0`, else 1
/// - duration: override if present, else the catalog default
/// - unit price: override if present and `≥ 0`, else the catalog price
pub fn resolve_option_override(
    option: &ServiceOption,
    value: Option<&OptionOverride>,
) -> ResolvedOption {
    let quantity = value
        .map(|o| o.quantity)
        .filter(|q| q.is_sign_positive() && !q.is_zero())
        .unwrap_or(Decimal::ONE);

    let duration = value
        .and_then(|o| o.duration)
        .unwrap_or(option.default_duration);

    let unit_price = value
        .and_then(|o| o.unit_price)
        .filter(|price| !price.is_negative())
        .unwrap_or(option.unit_price);

    ResolvedOption {
        quantity,
        duration,
        unit_price,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

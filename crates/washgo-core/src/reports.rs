//! # Reports
//!
//! Catalog statistics and export rows, computed from the same snapshots the
//! totals engine uses.
//!
//! ```text
//! Service ──► service_average_price / service_average_duration
//!    │
//!    └──► category_summary ◄── Engagement (revenue, cancelled excluded)
//!
//! Engagement (facture) ──► invoice_rows ──► CSV / PDF exporters
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{ExactMoney, Money};
use crate::numbering::display_document_number;
use crate::totals::{compute_engagement_totals, price_engagement};
use crate::types::{
    find_company, BillingSettings, ClientId, Company, Engagement, EngagementId, EngagementKind,
    EngagementStatus, Minutes, Service, ServiceCategory, ServiceOption, VatRate,
};

// =============================================================================
// Service Averages
// =============================================================================

/// Options a service average is taken over: the active ones, or all of them
/// when none is active.
fn priced_options(service: &Service) -> Vec<&ServiceOption> {
    let active: Vec<&ServiceOption> = service.options.iter().filter(|o| o.active).collect();
    if active.is_empty() {
        service.options.iter().collect()
    } else {
        active
    }
}

fn average_money(values: impl Iterator<Item = Money>) -> Money {
    let (sum, count) = values.fold((0i64, 0i64), |(sum, count), v| (sum + v.cents(), count + 1));
    if count == 0 {
        return Money::zero();
    }
    // Half away from zero, like VAT
    let rounded = if sum >= 0 {
        (sum + count / 2) / count
    } else {
        (sum - count / 2) / count
    };
    Money::from_cents(rounded)
}

/// Rounded to the whole minute.
fn average_minutes(values: impl Iterator<Item = Minutes>) -> Minutes {
    let (sum, count) = values.fold((Decimal::ZERO, 0u32), |(sum, count), m| {
        (sum.saturating_add(m.get()), count + 1)
    });
    if count == 0 {
        return Minutes::zero();
    }
    let average = sum / Decimal::from(count);
    Minutes::from_decimal(average.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Average unit price of a service's options, shown in the catalog list.
pub fn service_average_price(service: &Service) -> Money {
    average_money(priced_options(service).into_iter().map(|o| o.unit_price))
}

/// Average option duration of a service.
pub fn service_average_duration(service: &Service) -> Minutes {
    average_minutes(priced_options(service).into_iter().map(|o| o.default_duration))
}

// =============================================================================
// Revenue
// =============================================================================

fn counts_as_revenue(engagement: &Engagement) -> bool {
    engagement.status != EngagementStatus::Annule
}

/// Pre-VAT revenue of a client over non-cancelled engagements.
pub fn client_revenue(client: &ClientId, engagements: &[Engagement], catalog: &[Service]) -> Money {
    engagements
        .iter()
        .filter(|e| &e.client_id == client && counts_as_revenue(e))
        .map(|e| compute_engagement_totals(e, catalog).subtotal())
        .sum::<ExactMoney>()
        .round()
}

// =============================================================================
// Category Summary
// =============================================================================

/// One row of the per-category dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategorySummary {
    pub category: ServiceCategory,
    pub service_count: usize,
    pub active_count: usize,
    pub average_price: Money,
    pub average_duration: Minutes,
    /// Pre-VAT revenue of non-cancelled engagements on this category's services.
    pub revenue: Money,
}

/// Summarizes the catalog per category, in [`ServiceCategory::ALL`] order.
///
/// Every category gets a row, empty ones included.
pub fn category_summary(catalog: &[Service], engagements: &[Engagement]) -> Vec<CategorySummary> {
    ServiceCategory::ALL
        .iter()
        .map(|&category| {
            let services: Vec<&Service> =
                catalog.iter().filter(|s| s.category == category).collect();

            let options = || services.iter().flat_map(|s| s.options.iter());

            let revenue = engagements
                .iter()
                .filter(|e| counts_as_revenue(e))
                .filter(|e| services.iter().any(|s| s.id == e.service_id))
                .map(|e| compute_engagement_totals(e, catalog).subtotal())
                .sum::<ExactMoney>()
                .round();

            CategorySummary {
                category,
                service_count: services.len(),
                active_count: services.iter().filter(|s| s.active).count(),
                average_price: average_money(options().map(|o| o.unit_price)),
                average_duration: average_minutes(options().map(|o| o.default_duration)),
                revenue,
            }
        })
        .collect()
}

// =============================================================================
// Invoice Rows
// =============================================================================

/// Flat invoice line consumed by the CSV and PDF exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceRow {
    pub engagement_id: EngagementId,
    pub number: String,
    pub client_id: ClientId,
    pub company_name: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub vat_enabled: bool,
    pub vat_rate: VatRate,
    pub subtotal: Money,
    pub vat_amount: Money,
    pub total_ttc: Money,
}

/// Builds one row per invoiced engagement, ordered by date then number.
pub fn invoice_rows(
    engagements: &[Engagement],
    catalog: &[Service],
    companies: &[Company],
    settings: &BillingSettings,
) -> Vec<InvoiceRow> {
    let mut rows: Vec<InvoiceRow> = engagements
        .iter()
        .filter(|e| e.kind == EngagementKind::Facture)
        .map(|e| {
            let company = e
                .company_id
                .as_ref()
                .and_then(|id| find_company(companies, id));
            let totals = price_engagement(e, catalog, company, settings);

            InvoiceRow {
                engagement_id: e.id.clone(),
                number: display_document_number(e),
                client_id: e.client_id.clone(),
                company_name: company.map(|c| c.name.clone()),
                date: e.scheduled_at,
                vat_enabled: e.effective_vat_enabled(company, settings),
                vat_rate: settings.vat_rate,
                subtotal: totals.subtotal,
                vat_amount: totals.vat_amount,
                total_ttc: totals.total_ttc,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.number.cmp(&b.number)));
    rows
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::OptionOverride;
    use crate::types::{CompanyId, OptionId, ServiceId};
    use chrono::TimeZone;

    fn option(id: &str, cents: i64, minutes: u32, active: bool) -> ServiceOption {
        ServiceOption {
            id: OptionId::new(id),
            label: id.to_string(),
            description: None,
            default_duration: Minutes::new(minutes),
            unit_price: Money::from_cents(cents),
            vat_pct: Some(20.0),
            active,
        }
    }

    fn catalog() -> Vec<Service> {
        vec![
            Service {
                id: ServiceId::new("car"),
                name: "Intérieur".into(),
                description: None,
                category: ServiceCategory::Voiture,
                options: vec![option("a", 1000, 30, true), option("b", 2500, 45, true)],
                active: true,
            },
            Service {
                id: ServiceId::new("sofa"),
                name: "Canapé 3 places".into(),
                description: None,
                category: ServiceCategory::Canape,
                options: vec![option("c", 8000, 90, false)],
                active: false,
            },
        ]
    }

    fn engagement(id: &str, client: &str, service: &str, options: &[&str]) -> Engagement {
        let mut e = Engagement::new(
            EngagementId::new(id),
            ClientId::new(client),
            ServiceId::new(service),
            Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
        );
        e.set_option_ids(options.iter().map(|o| OptionId::new(*o)));
        e
    }

    #[test]
    fn test_service_averages() {
        let services = catalog();
        assert_eq!(service_average_price(&services[0]), Money::from_cents(1750));
        assert_eq!(service_average_duration(&services[0]), Minutes::new(38));

        // Only inactive options: falls back to all of them
        assert_eq!(service_average_price(&services[1]), Money::from_cents(8000));

        let mut mixed = services[0].clone();
        mixed.options[1].active = false;
        assert_eq!(service_average_price(&mixed), Money::from_cents(1000));

        let mut empty = services[0].clone();
        empty.options.clear();
        assert_eq!(service_average_price(&empty), Money::zero());
        assert_eq!(service_average_duration(&empty), Minutes::zero());
    }

    #[test]
    fn test_client_revenue_excludes_cancelled() {
        let mut cancelled = engagement("2", "alice", "car", &["b"]);
        cancelled.status = EngagementStatus::Annule;
        let engagements = vec![
            engagement("1", "alice", "car", &["a", "b"]),
            cancelled,
            engagement("3", "bob", "car", &["a"]),
        ];

        let revenue = client_revenue(&ClientId::new("alice"), &engagements, &catalog());
        assert_eq!(revenue, Money::from_cents(3500));
    }

    #[test]
    fn test_revenue_sums_half_cents_before_rounding() {
        let half_unit = |id: &str| {
            let mut e = engagement(id, "alice", "car", &["a"]);
            e.set_override(
                OptionId::new("a"),
                OptionOverride::with_quantity(Decimal::new(15, 1)).unit_price(Money::from_cents(333)),
            );
            e
        };
        let engagements = vec![half_unit("1"), half_unit("2")];

        // 499.5 + 499.5, not 500 + 500
        let revenue = client_revenue(&ClientId::new("alice"), &engagements, &catalog());
        assert_eq!(revenue, Money::from_cents(999));
        assert_eq!(category_summary(&catalog(), &engagements)[0].revenue, Money::from_cents(999));
    }

    #[test]
    fn test_category_summary_lists_every_category() {
        let engagements = vec![
            engagement("1", "alice", "car", &["a"]),
            engagement("2", "bob", "sofa", &["c"]),
        ];
        let summary = category_summary(&catalog(), &engagements);

        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].category, ServiceCategory::Voiture);
        assert_eq!(summary[0].service_count, 1);
        assert_eq!(summary[0].active_count, 1);
        assert_eq!(summary[0].revenue, Money::from_cents(1000));

        assert_eq!(summary[1].category, ServiceCategory::Canape);
        assert_eq!(summary[1].active_count, 0);
        assert_eq!(summary[1].revenue, Money::from_cents(8000));

        assert_eq!(summary[3].service_count, 0);
        assert_eq!(summary[3].revenue, Money::zero());
    }

    #[test]
    fn test_invoice_rows_only_include_invoices() {
        let companies = vec![Company {
            id: CompanyId::new("co"),
            name: "Wash&Go".into(),
            vat_enabled: true,
        }];

        let mut invoiced = engagement("7", "alice", "car", &["a", "b"]);
        invoiced.kind = EngagementKind::Facture;
        invoiced.invoice_number = Some("FAC-202503-0001".into());
        invoiced.company_id = Some(CompanyId::new("co"));
        invoiced.set_additional_charge(Money::from_cents(500));

        let quote = {
            let mut e = engagement("8", "bob", "car", &["a"]);
            e.kind = EngagementKind::Devis;
            e
        };

        let rows = invoice_rows(
            &[invoiced, quote],
            &catalog(),
            &companies,
            &BillingSettings::default(),
        );

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.number, "FAC-202503-0001");
        assert_eq!(row.company_name.as_deref(), Some("Wash&Go"));
        assert_eq!(row.subtotal, Money::from_cents(4000));
        assert_eq!(row.vat_amount, Money::from_cents(800));
        assert_eq!(row.total_ttc, Money::from_cents(4800));
    }
}

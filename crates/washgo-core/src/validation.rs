//! # Validation Module
//!
//! Boundary checks run before anything reaches the database.
//!
//! ## Validation vs Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog & company edits          Engagement form input                 │
//! │  (admin screens)                  (option overrides)                    │
//! │         │                                  │                            │
//! │         ▼                                  ▼                            │
//! │  THIS MODULE: reject              overrides::normalize: clamp           │
//! │  ValidationError                  never fails                           │
//! │         │                                  │                            │
//! │         └──────────────┬───────────────────┘                            │
//! │                        ▼                                                │
//! │  Database constraints (NOT NULL, UNIQUE, FOREIGN KEY)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use washgo_core::validation::{validate_label, validate_unit_price};
//! use washgo_core::money::Money;
//!
//! validate_label("Aspiration sièges").unwrap();
//! validate_unit_price(Money::from_cents(2500)).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::numbering::{DocumentKind, DocumentNumber};
use crate::types::Service;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest label accepted for services and options.
pub const MAX_LABEL_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // Characters, not bytes: labels are French
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a service or option label.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use washgo_core::validation::validate_label;
///
/// assert!(validate_label("Shampoing canapé").is_ok());
/// assert!(validate_label("   ").is_err());
/// assert!(validate_label(&"é".repeat(201)).is_err());
/// ```
pub fn validate_label(label: &str) -> ValidationResult<()> {
    validate_text("label", label, MAX_LABEL_LEN)
}

/// Validates a company name.
pub fn validate_company_name(name: &str) -> ValidationResult<()> {
    validate_text("company name", name, MAX_LABEL_LEN)
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates an engagement surcharge. Zero is allowed.
pub fn validate_additional_charge(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "additional_charge".to_string(),
        });
    }
    Ok(())
}

/// Validates a catalog unit price.
///
/// ## Example
/// ```rust
/// use washgo_core::money::Money;
/// use washgo_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_cents(0)).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_price".to_string(),
        });
    }
    Ok(())
}

/// Validates a VAT rate in basis points (0 % to 100 %).
pub fn validate_vat_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "vat_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }
    Ok(())
}

// =============================================================================
// Document Numbers
// =============================================================================

/// Checks a number entered through the administrative override.
///
/// Must parse as `{PREFIX}-{YYYYMM}-{SEQ}` with the prefix of `kind`.
pub fn validate_document_number(
    kind: DocumentKind,
    number: &str,
) -> ValidationResult<DocumentNumber> {
    let parsed: DocumentNumber = number.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "document_number".to_string(),
        reason: format!("expected {}-YYYYMM-NNNN", kind.prefix()),
    })?;

    if parsed.kind() != kind {
        return Err(ValidationError::InvalidFormat {
            field: "document_number".to_string(),
            reason: format!("expected prefix {}", kind.prefix()),
        });
    }

    Ok(parsed)
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates a whole service before it is saved to the catalog.
///
/// ## Rules
/// - Non-empty name
/// - Every option has a valid label and a non-negative price
/// - Option ids are unique within the service
pub fn validate_service(service: &Service) -> ValidationResult<()> {
    validate_text("service name", &service.name, MAX_LABEL_LEN)?;

    let mut seen = HashSet::new();
    for option in &service.options {
        validate_label(&option.label)?;
        validate_unit_price(option.unit_price)?;
        if !seen.insert(&option.id) {
            return Err(ValidationError::Duplicate {
                field: "option id".to_string(),
                value: option.id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Minutes, OptionId, ServiceCategory, ServiceId, ServiceOption};

    fn option(id: &str, label: &str, cents: i64) -> ServiceOption {
        ServiceOption {
            id: OptionId::new(id),
            label: label.to_string(),
            description: None,
            default_duration: Minutes::new(30),
            unit_price: Money::from_cents(cents),
            vat_pct: None,
            active: true,
        }
    }

    fn service(options: Vec<ServiceOption>) -> Service {
        Service {
            id: ServiceId::new("s1"),
            name: "Nettoyage extérieur".to_string(),
            description: None,
            category: ServiceCategory::Voiture,
            options,
            active: true,
        }
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("Lustrage").is_ok());
        assert!(validate_label(&"é".repeat(200)).is_ok());

        assert!(matches!(
            validate_label(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_label(&"a".repeat(201)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
    }

    #[test]
    fn test_validate_company_name() {
        assert!(validate_company_name("Wash&Go Lyon").is_ok());
        assert!(validate_company_name("  ").is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_additional_charge(Money::zero()).is_ok());
        assert!(validate_additional_charge(Money::from_cents(-1)).is_err());
        assert!(validate_unit_price(Money::from_cents(4500)).is_ok());
        assert!(validate_unit_price(Money::from_cents(-4500)).is_err());
    }

    #[test]
    fn test_validate_vat_rate_bps() {
        assert!(validate_vat_rate_bps(0).is_ok());
        assert!(validate_vat_rate_bps(2000).is_ok());
        assert!(validate_vat_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_document_number() {
        let parsed = validate_document_number(DocumentKind::Invoice, "FAC-202503-0042").unwrap();
        assert_eq!(parsed.sequence(), 42);

        assert!(validate_document_number(DocumentKind::Quote, "FAC-202503-0042").is_err());
        assert!(validate_document_number(DocumentKind::Invoice, "FAC-2025-1").is_err());
    }

    #[test]
    fn test_validate_service() {
        assert!(validate_service(&service(vec![
            option("a", "Aspiration", 1000),
            option("b", "Vitres", 1500),
        ]))
        .is_ok());

        let duplicate = service(vec![option("a", "Aspiration", 1000), option("a", "Copie", 10)]);
        assert!(matches!(
            validate_service(&duplicate),
            Err(ValidationError::Duplicate { .. })
        ));

        let negative = service(vec![option("a", "Aspiration", -5)]);
        assert!(matches!(
            validate_service(&negative),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
    }
}

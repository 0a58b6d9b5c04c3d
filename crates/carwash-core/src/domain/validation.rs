use rust_decimal::Decimal;

use crate::domain::{
    entities::{ClientDraft, ServiceDraft, TariffDraft, VehicleDraft},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Field-level checks live here; each draft's `validate()` composes them.
pub struct DomainValidator;

impl DomainValidator {
    /// A required text field must contain something besides whitespace.
    pub fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field });
        }
        Ok(())
    }

    pub fn require_non_negative(field: &'static str, value: Decimal) -> Result<(), DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::InvalidField {
                field,
                reason: format!("{value} is negative"),
            });
        }
        Ok(())
    }

    pub fn validate_client(draft: &ClientDraft) -> Result<(), DomainError> {
        draft.validate()
    }

    pub fn validate_vehicle(draft: &VehicleDraft) -> Result<(), DomainError> {
        draft.validate()
    }

    pub fn validate_tariff(draft: &TariffDraft) -> Result<(), DomainError> {
        draft.validate()
    }

    pub fn validate_service(draft: &ServiceDraft) -> Result<(), DomainError> {
        draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_counts_as_missing() {
        assert!(DomainValidator::require_text("Nombre", " \t").is_err());
        assert!(DomainValidator::require_text("Nombre", "Lavado").is_ok());
    }

    #[test]
    fn zero_is_not_negative() {
        assert!(DomainValidator::require_non_negative("Tarifa", Decimal::ZERO).is_ok());
        assert!(DomainValidator::require_non_negative("Tarifa", Decimal::from(-1)).is_err());
    }
}

//! Domain value objects: the identifiers every entity is keyed by.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no behaviour beyond
//! construction, display and parsing. Two families exist:
//!
//! - **Natural keys** (`Cedula`, `Plate`) are supplied by staff, validated on
//!   construction, and immutable once the record exists.
//! - **Collaborator ids** (`TariffId`, `ServiceId`, ...) are assigned by the
//!   remote API on create and are opaque to the core.
//!
//! Values decoded from the wire are trusted: `serde(transparent)` skips the
//! constructor checks, which only guard staff input.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Cedula ───────────────────────────────────────────────────────────────────

/// National-ID-like natural key of a [`Client`](crate::domain::Client).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cedula(u64);

impl Cedula {
    /// Build a cedula from staff input. Zero is the "unset" sentinel of the
    /// collaborator's forms and is rejected.
    pub fn new(value: u64) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidField {
                field: "Cedula",
                reason: "must be a positive number".into(),
            });
        }
        Ok(Self(value))
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cedula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cedula {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<u64>().map_err(|_| DomainError::InvalidField {
            field: "Cedula",
            reason: format!("'{s}' is not a number"),
        })?;
        Self::new(value)
    }
}

// ── Plate ────────────────────────────────────────────────────────────────────

/// Licence plate, the natural key of a [`Vehicle`](crate::domain::Vehicle).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plate(String);

impl Plate {
    pub fn new(value: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "Placa" });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Plate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── Collaborator ids ─────────────────────────────────────────────────────────

macro_rules! collaborator_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| DomainError::InvalidField {
                        field: $label,
                        reason: format!("'{s}' is not a number"),
                    })
            }
        }
    };
}

collaborator_id!(
    /// Identifier of a [`ParkingTariff`](crate::domain::ParkingTariff).
    TariffId,
    "Tarifa id"
);
collaborator_id!(
    /// Identifier of a [`CarWashService`](crate::domain::CarWashService).
    ServiceId,
    "Servicio_id"
);
collaborator_id!(
    /// Identifier of a [`ServiceAssignment`](crate::domain::ServiceAssignment).
    AssignmentId,
    "Asignacion id"
);
collaborator_id!(
    /// Identifier shared by parking and car-wash invoices.
    InvoiceId,
    "Factura id"
);
collaborator_id!(
    /// Identifier of a parking ticket issued at the gate.
    TicketId,
    "Ticket_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cedula_rejects_zero() {
        assert!(Cedula::new(0).is_err());
        assert_eq!(Cedula::new(1_234).unwrap().value(), 1_234);
    }

    #[test]
    fn cedula_parses_trimmed_digits() {
        assert_eq!("  42 ".parse::<Cedula>().unwrap(), Cedula::new(42).unwrap());
        assert!("abc".parse::<Cedula>().is_err());
    }

    #[test]
    fn plate_is_trimmed_and_required() {
        assert_eq!(Plate::new(" ABC-123 ").unwrap().as_str(), "ABC-123");
        assert!(matches!(
            Plate::new("   "),
            Err(DomainError::MissingRequiredField { field: "Placa" })
        ));
    }

    #[test]
    fn ids_serialise_as_bare_numbers() {
        let json = serde_json::to_string(&ServiceId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ServiceId = serde_json::from_str("7").unwrap();
        assert_eq!(back, ServiceId::new(7));
    }

    #[test]
    fn id_parse_error_names_the_field() {
        let err = "x".parse::<TicketId>().unwrap_err();
        assert!(err.to_string().contains("Ticket_id"));
    }
}

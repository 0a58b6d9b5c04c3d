//! Clients of the business, keyed by their cedula.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainValidator as validator, value_objects::Cedula};

/// A client as stored by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "Cedula")]
    pub cedula: Cedula,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Telefono")]
    pub phone: String,
    #[serde(rename = "Direccion")]
    pub address: String,
}

/// Staff input for creating or editing a client.
///
/// The cedula is caller-supplied, so unlike collaborator-keyed drafts it is
/// part of the draft itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDraft {
    #[serde(rename = "Cedula")]
    pub cedula: Cedula,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Telefono")]
    pub phone: String,
    #[serde(rename = "Direccion")]
    pub address: String,
}

impl ClientDraft {
    pub fn new(
        cedula: Cedula,
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            cedula,
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// Every field is mandatory.
    pub fn validate(&self) -> Result<(), DomainError> {
        validator::require_text("Nombre", &self.name)?;
        validator::require_text("Telefono", &self.phone)?;
        validator::require_text("Direccion", &self.address)
    }
}

impl From<Client> for ClientDraft {
    fn from(client: Client) -> Self {
        Self {
            cedula: client.cedula,
            name: client.name,
            phone: client.phone,
            address: client.address,
        }
    }
}

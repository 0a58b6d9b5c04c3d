//! REST gateway to the car-wash API.
//!
//! One `reqwest::Client` serves every repository port. Responses are
//! decoded straight into domain entities; the wire names are fixed by the
//! entities' serde attributes.

mod status;

use std::time::Duration;

use async_trait::async_trait;
use carwash_core::{
    application::{
        AssignmentRepository, CarWashInvoiceRepository, ClientRepository,
        ParkingInvoiceRepository, RepoResult, RepositoryError, Resource, ServiceRepository, TariffRepository,
        VehicleRepository,
    },
    domain::{
        AssignmentDraft, AssignmentId, CarWashInvoice, CarWashInvoiceDraft, CarWashService,
        Cedula, Client, ClientDraft, ParkingInvoice, ParkingInvoiceDraft, ParkingTariff, Plate,
        ServiceAssignment, ServiceDraft, ServiceId, TariffDraft, TariffId, Vehicle, VehicleDraft,
    },
    error::{CarwashError, CarwashResult},
};
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;

use status::{status_error, transport_error};

pub const DEFAULT_BASE_URL: &str = "https://mr-carwash-api.onrender.com/api";

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Repository implementation backed by the REST collaborator.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: HttpConfig) -> CarwashResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("carwash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CarwashError::Configuration {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join percent-encoded path segments onto the base URL.
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!(%method, %url, "API request");
        self.client.request(method, url)
    }

    /// Send and return the raw body of a 2xx response.
    async fn execute(
        &self,
        resource: Resource,
        key: Option<&str>,
        request: RequestBuilder,
    ) -> RepoResult<Vec<u8>> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(resource, &e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(resource, &e))?;

        debug!(status = status.as_u16(), bytes = body.len(), "API response");
        if !status.is_success() {
            return Err(status_error(resource, key, status, &body));
        }
        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
        key: Option<&str>,
        request: RequestBuilder,
    ) -> RepoResult<T> {
        let body = self.execute(resource, key, request).await?;
        serde_json::from_slice(&body).map_err(|e| RepositoryError::Decode {
            resource,
            reason: e.to_string(),
        })
    }

    async fn fetch_all<T: DeserializeOwned>(&self, resource: Resource) -> RepoResult<Vec<T>> {
        let request = self.request(Method::GET, &[resource.path()]);
        self.fetch(resource, None, request).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        resource: Resource,
        body: &B,
    ) -> RepoResult<T> {
        let request = self.request(Method::POST, &[resource.path()]).json(body);
        self.fetch(resource, None, request).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        resource: Resource,
        key: &str,
        body: &B,
    ) -> RepoResult<T> {
        let request = self
            .request(Method::PUT, &[resource.path(), key])
            .json(body);
        self.fetch(resource, Some(key), request).await
    }

    async fn remove(&self, resource: Resource, key: &str) -> RepoResult<()> {
        let request = self.request(Method::DELETE, &[resource.path(), key]);
        self.execute(resource, Some(key), request).await.map(|_| ())
    }
}

// ── Clients ──────────────────────────────────────────────────────────────────

#[async_trait]
impl ClientRepository for HttpGateway {
    async fn list(&self) -> RepoResult<Vec<Client>> {
        self.fetch_all(Resource::Client).await
    }

    async fn create(&self, draft: ClientDraft) -> RepoResult<Client> {
        self.post(Resource::Client, &draft).await
    }

    async fn update(&self, cedula: Cedula, draft: ClientDraft) -> RepoResult<Client> {
        self.put(Resource::Client, &cedula.to_string(), &draft).await
    }

    async fn delete(&self, cedula: Cedula) -> RepoResult<()> {
        self.remove(Resource::Client, &cedula.to_string()).await
    }
}

// ── Vehicles ─────────────────────────────────────────────────────────────────

#[async_trait]
impl VehicleRepository for HttpGateway {
    async fn list(&self) -> RepoResult<Vec<Vehicle>> {
        self.fetch_all(Resource::Vehicle).await
    }

    async fn create(&self, draft: VehicleDraft) -> RepoResult<Vehicle> {
        self.post(Resource::Vehicle, &draft).await
    }

    async fn update(&self, plate: &Plate, draft: VehicleDraft) -> RepoResult<Vehicle> {
        self.put(Resource::Vehicle, plate.as_str(), &draft).await
    }

    async fn delete(&self, plate: &Plate) -> RepoResult<()> {
        self.remove(Resource::Vehicle, plate.as_str()).await
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[async_trait]
impl TariffRepository for HttpGateway {
    async fn list(&self) -> RepoResult<Vec<ParkingTariff>> {
        self.fetch_all(Resource::Tariff).await
    }

    async fn create(&self, draft: TariffDraft) -> RepoResult<ParkingTariff> {
        self.post(Resource::Tariff, &draft).await
    }

    async fn update(&self, id: TariffId, draft: TariffDraft) -> RepoResult<ParkingTariff> {
        self.put(Resource::Tariff, &id.to_string(), &draft).await
    }

    async fn delete(&self, id: TariffId) -> RepoResult<()> {
        self.remove(Resource::Tariff, &id.to_string()).await
    }
}

#[async_trait]
impl ServiceRepository for HttpGateway {
    async fn list(&self) -> RepoResult<Vec<CarWashService>> {
        self.fetch_all(Resource::Service).await
    }

    async fn create(&self, draft: ServiceDraft) -> RepoResult<CarWashService> {
        self.post(Resource::Service, &draft).await
    }

    async fn update(&self, id: ServiceId, draft: ServiceDraft) -> RepoResult<CarWashService> {
        self.put(Resource::Service, &id.to_string(), &draft).await
    }

    async fn delete(&self, id: ServiceId) -> RepoResult<()> {
        self.remove(Resource::Service, &id.to_string()).await
    }
}

// ── Assignments ──────────────────────────────────────────────────────────────

#[async_trait]
impl AssignmentRepository for HttpGateway {
    async fn list_for_vehicle(&self, plate: &Plate) -> RepoResult<Vec<ServiceAssignment>> {
        let resource = Resource::Assignment;
        let request = self.request(
            Method::GET,
            &[Resource::Vehicle.path(), plate.as_str(), resource.path()],
        );
        self.fetch(resource, Some(plate.as_str()), request).await
    }

    async fn create(
        &self,
        plate: &Plate,
        draft: AssignmentDraft,
    ) -> RepoResult<ServiceAssignment> {
        let resource = Resource::Assignment;
        let request = self
            .request(
                Method::POST,
                &[Resource::Vehicle.path(), plate.as_str(), resource.path()],
            )
            .json(&draft);
        self.fetch(resource, Some(plate.as_str()), request).await
    }

    async fn mark_billed(&self, plate: &Plate, id: AssignmentId) -> RepoResult<ServiceAssignment> {
        let resource = Resource::Assignment;
        let id = id.to_string();
        let request = self
            .request(
                Method::PUT,
                &[Resource::Vehicle.path(), plate.as_str(), resource.path(), id.as_str()],
            )
            .json(&json!({ "Facturado": true }));
        self.fetch(resource, Some(&id), request).await
    }
}

// ── Invoices ─────────────────────────────────────────────────────────────────

#[async_trait]
impl ParkingInvoiceRepository for HttpGateway {
    async fn list(&self) -> RepoResult<Vec<ParkingInvoice>> {
        self.fetch_all(Resource::ParkingInvoice).await
    }

    async fn create(&self, draft: ParkingInvoiceDraft) -> RepoResult<ParkingInvoice> {
        self.post(Resource::ParkingInvoice, &draft).await
    }
}

#[async_trait]
impl CarWashInvoiceRepository for HttpGateway {
    async fn list(&self) -> RepoResult<Vec<CarWashInvoice>> {
        self.fetch_all(Resource::CarWashInvoice).await
    }

    async fn create(&self, draft: CarWashInvoiceDraft) -> RepoResult<CarWashInvoice> {
        self.post(Resource::CarWashInvoice, &draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_percent_encoded() {
        let gateway = HttpGateway::new(HttpConfig {
            base_url: "http://localhost:9/api/".into(),
            ..HttpConfig::default()
        })
        .unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:9/api");
        assert_eq!(
            gateway.url(&["vehiculos", "AB 12/3", "servicios"]),
            "http://localhost:9/api/vehiculos/AB%2012%2F3/servicios"
        );
    }
}

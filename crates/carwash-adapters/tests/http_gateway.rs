//! HttpGateway against an in-test mock of the car-wash API.

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use carwash_adapters::{HttpConfig, HttpGateway};
use carwash_core::application::{
    AssignmentRepository, CarWashInvoiceRepository, ClientRepository, ParkingInvoiceRepository,
    RepositoryError, Resource, ServiceRepository, TariffRepository, VehicleRepository,
};
use carwash_core::domain::{
    AssignmentId, CarWashInvoiceDraft, Cedula, Plate, ServiceSnapshot, ServiceId, TariffDraft,
    TariffId, VehicleDraft,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorder {
    fn push(&self, what: String, body: Value) {
        self.seen.lock().unwrap().push((what, body));
    }

    fn take(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

fn mock_api(recorder: Recorder) -> Router {
    Router::new()
        .route(
            "/api/clientes",
            get(|| async {
                Json(json!([
                    {"Cedula": 101, "Nombre": "Ana", "Telefono": "555", "Direccion": "Calle 1"},
                    {"Cedula": 202, "Nombre": "Luis", "Telefono": "556", "Direccion": "Calle 2"}
                ]))
            }),
        )
        .route(
            "/api/clientes/:cedula",
            delete(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"message": "El cliente tiene vehiculos"})),
                )
            }),
        )
        .route(
            "/api/vehiculos",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"message": "La placa ya existe"})),
                )
            }),
        )
        .route(
            "/api/vehiculos/:placa/servicios",
            get(|Path(placa): Path<String>| async move {
                Json(json!([
                    {"id": 5, "Placa_Vehiculo": placa, "Servicio_id": 2,
                     "Fecha_Servicio": "2024-05-01T10:00:00Z", "Facturado": false},
                    {"id": 6, "Placa_Vehiculo": placa, "Servicio_id": 3,
                     "Fecha_Servicio": "2024-05-01T10:05:00Z"}
                ]))
            }),
        )
        .route(
            "/api/vehiculos/:placa/servicios/:id",
            put(
                |State(rec): State<Recorder>,
                 Path((placa, id)): Path<(String, u64)>,
                 Json(body): Json<Value>| async move {
                    rec.push(format!("PUT {placa}/{id}"), body);
                    Json(json!({
                        "id": id, "Placa_Vehiculo": placa, "Servicio_id": 2,
                        "Fecha_Servicio": "2024-05-01T10:00:00Z", "Facturado": true
                    }))
                },
            ),
        )
        .route(
            "/api/tarifas_parking/:id",
            put(|| async { StatusCode::NOT_FOUND }),
        )
        .route(
            "/api/servicios_car_wash",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream asleep") }),
        )
        .route("/api/facturas_parking", get(|| async { "{not json" }))
        .route(
            "/api/facturas_car_wash",
            post(
                |State(rec): State<Recorder>, Json(mut body): Json<Value>| async move {
                    rec.push("POST facturas_car_wash".into(), body.clone());
                    body["id"] = json!(77);
                    Json(body)
                },
            ),
        )
        .with_state(recorder)
}

async fn spawn(recorder: Recorder) -> HttpGateway {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = mock_api(recorder);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpGateway::new(HttpConfig {
        base_url: format!("http://{addr}/api"),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn plate(s: &str) -> Plate {
    Plate::new(s).unwrap()
}

#[tokio::test]
async fn lists_decode_collaborator_field_names() {
    let gw = spawn(Recorder::default()).await;
    let clients = ClientRepository::list(&gw).await.unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].cedula, Cedula::new(101).unwrap());
    assert_eq!(clients[1].name, "Luis");
}

#[tokio::test]
async fn rejected_create_carries_the_message() {
    let gw = spawn(Recorder::default()).await;
    let draft = VehicleDraft::new(plate("ABC123"), "Kia", "Rio", "Azul", Cedula::new(1).unwrap());
    let err = VehicleRepository::create(&gw, draft).await.unwrap_err();
    assert_eq!(
        err,
        RepositoryError::Validation {
            resource: Resource::Vehicle,
            reason: "La placa ya existe".into(),
        }
    );
}

#[tokio::test]
async fn conflict_on_delete_is_surfaced() {
    let gw = spawn(Recorder::default()).await;
    let err = ClientRepository::delete(&gw, Cedula::new(101).unwrap())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RepositoryError::Conflict {
            resource: Resource::Client,
            key: "101".into(),
            reason: "El cliente tiene vehiculos".into(),
        }
    );
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let gw = spawn(Recorder::default()).await;
    let draft = TariffDraft::new("Carro", Decimal::from(2), Decimal::ONE);
    let err = TariffRepository::update(&gw, TariffId::new(9), draft)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RepositoryError::NotFound {
            resource: Resource::Tariff,
            key: "9".into(),
        }
    );
}

#[tokio::test]
async fn server_errors_are_retryable_transport() {
    let gw = spawn(Recorder::default()).await;
    let err = ServiceRepository::list(&gw).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("upstream asleep"));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let gw = spawn(Recorder::default()).await;
    let err = ParkingInvoiceRepository::list(&gw).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Decode {
            resource: Resource::ParkingInvoice,
            ..
        }
    ));
}

#[tokio::test]
async fn assignments_default_to_unbilled() {
    let gw = spawn(Recorder::default()).await;
    let assignments = gw.list_for_vehicle(&plate("ABC123")).await.unwrap();
    assert_eq!(assignments.len(), 2);
    assert!(assignments.iter().all(|a| !a.billed));
}

#[tokio::test]
async fn mark_billed_puts_the_flag_on_an_encoded_route() {
    let recorder = Recorder::default();
    let gw = spawn(recorder.clone()).await;

    let updated = gw
        .mark_billed(&plate("ABC 123"), AssignmentId::new(5))
        .await
        .unwrap();
    assert!(updated.billed);

    let seen = recorder.take();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "PUT ABC 123/5");
    assert_eq!(seen[0].1, json!({"Facturado": true}));
}

#[tokio::test]
async fn car_wash_invoice_is_posted_with_snapshot_lines() {
    let recorder = Recorder::default();
    let gw = spawn(recorder.clone()).await;

    let draft = CarWashInvoiceDraft {
        client: Cedula::new(101).unwrap(),
        plate: plate("ABC123"),
        services: vec![ServiceSnapshot {
            service_id: ServiceId::new(2),
            name: "Wax".into(),
            tariff: Decimal::from(15),
        }],
        total: Decimal::from(15),
        issued_at: Utc::now(),
    };
    let invoice = CarWashInvoiceRepository::create(&gw, draft).await.unwrap();
    assert_eq!(invoice.total, Decimal::from(15));

    let (_, body) = recorder.take().remove(0);
    assert_eq!(body["Cedula_Cliente"], 101);
    assert_eq!(body["Servicios"][0]["Nombre"], "Wax");
    assert_eq!(body["Total"], 15.0);
}

#[tokio::test]
async fn unreachable_api_is_transport() {
    // Grab a free port, then close it.
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gw = HttpGateway::new(HttpConfig {
        base_url: format!("http://{addr}/api"),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let err = ClientRepository::list(&gw).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Transport { .. }));
}

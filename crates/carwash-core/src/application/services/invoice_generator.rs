//! Invoice Generator - turns billable work into finalized invoices.
//!
//! Car-wash invoices aggregate a vehicle's unbilled assignments, snapshot the
//! current catalog price of each, persist the invoice and only then mark the
//! assignments billed. Parking invoices price one ticket's stay.
//!
//! Nothing here retries. A failure after the invoice was persisted is reported
//! as an incident carrying every id needed to reconcile by hand.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::{
    application::{
        PendingBilling, WorkflowError,
        ports::Repositories,
        services::KeyedLocks,
    },
    domain::{
        CarWashInvoice, CarWashInvoiceDraft, CarWashService, ParkingInvoice, ParkingInvoiceDraft,
        ParkingTariff, ParkingTicket, ServiceAssignment, ServiceId, ServiceSnapshot, Vehicle,
        pricing,
    },
    error::CarwashResult,
};

pub struct InvoiceGenerator {
    repos: Repositories,
    locks: KeyedLocks,
}

impl InvoiceGenerator {
    pub fn new(repos: Repositories, locks: KeyedLocks) -> Self {
        Self { repos, locks }
    }

    /// Invoice every unbilled service performed on `vehicle`.
    #[instrument(skip_all, fields(plate = %vehicle.plate))]
    pub async fn generate_car_wash_invoice(
        &self,
        vehicle: &Vehicle,
    ) -> CarwashResult<CarWashInvoice> {
        let plate = &vehicle.plate;
        let _guard = self.locks.vehicle(plate).await;

        let unbilled: Vec<ServiceAssignment> = self
            .repos
            .assignments
            .list_for_vehicle(plate)
            .await?
            .into_iter()
            .filter(|a| a.is_billable())
            .collect();

        if unbilled.is_empty() {
            return Err(WorkflowError::NoUnbilledAssignments {
                plate: plate.clone(),
            }
            .into());
        }

        let catalog = self.repos.services.list().await?;
        let lines = Self::snapshot_lines(vehicle, &unbilled, &catalog)?;
        let total = pricing::car_wash_total(&lines)?;

        let draft = CarWashInvoiceDraft {
            client: vehicle.owner,
            plate: plate.clone(),
            services: lines,
            total,
            issued_at: Utc::now(),
        };
        draft.validate()?;

        let invoice = self.repos.car_wash_invoices.create(draft).await?;
        info!(invoice = %invoice.id, total = %invoice.total, lines = invoice.services.len(), "Car-wash invoice created");

        self.mark_consumed(&invoice, &unbilled).await?;
        Ok(invoice)
    }

    /// Invoice a parking stay that ends at `exit`.
    #[instrument(skip_all, fields(ticket = %ticket.id, tariff = %tariff.id))]
    pub async fn generate_parking_invoice(
        &self,
        ticket: &ParkingTicket,
        tariff: &ParkingTariff,
        exit: DateTime<Utc>,
    ) -> CarwashResult<ParkingInvoice> {
        let _guard = self.locks.ticket(ticket.id).await;

        let existing = self.repos.parking_invoices.list().await?;
        if let Some(previous) = existing.iter().find(|i| i.ticket_id == ticket.id) {
            return Err(WorkflowError::TicketAlreadyInvoiced {
                ticket: ticket.id,
                invoice: previous.id,
            }
            .into());
        }

        let total = pricing::parking_total(tariff, ticket.entry_time, exit)?;
        let draft = ParkingInvoiceDraft {
            ticket_id: ticket.id,
            tariff_id: tariff.id,
            exit_time: exit,
            total,
            issued_at: Utc::now(),
        };
        draft.validate()?;

        let invoice = self.repos.parking_invoices.create(draft).await?;
        info!(invoice = %invoice.id, total = %invoice.total, "Parking invoice created");
        Ok(invoice)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn snapshot_lines(
        vehicle: &Vehicle,
        unbilled: &[ServiceAssignment],
        catalog: &[CarWashService],
    ) -> Result<Vec<ServiceSnapshot>, WorkflowError> {
        let by_id: HashMap<ServiceId, &CarWashService> =
            catalog.iter().map(|s| (s.id, s)).collect();

        unbilled
            .iter()
            .map(|assignment| {
                by_id
                    .get(&assignment.service_id)
                    .map(|service| ServiceSnapshot::from(*service))
                    .ok_or_else(|| WorkflowError::UnknownService {
                        plate: vehicle.plate.clone(),
                        assignment_id: assignment.id,
                        service_id: assignment.service_id,
                    })
            })
            .collect()
    }

    /// Flip `billed` on every consumed assignment, collecting failures.
    async fn mark_consumed(
        &self,
        invoice: &CarWashInvoice,
        consumed: &[ServiceAssignment],
    ) -> Result<(), WorkflowError> {
        let mut marked = Vec::with_capacity(consumed.len());
        let mut pending = Vec::new();

        for assignment in consumed {
            match self
                .repos
                .assignments
                .mark_billed(&invoice.plate, assignment.id)
                .await
            {
                Ok(_) => marked.push(assignment.id),
                Err(e) => {
                    warn!(assignment = %assignment.id, error = %e, "Could not mark assignment billed");
                    pending.push(PendingBilling {
                        assignment: assignment.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        error!(
            invoice = %invoice.id,
            plate = %invoice.plate,
            marked = ?marked,
            pending = ?pending.iter().map(|p| p.assignment).collect::<Vec<_>>(),
            "Invoice persisted but billing is incomplete; manual reconciliation required"
        );
        Err(WorkflowError::InvoiceCreatedBillingIncomplete {
            invoice: invoice.id,
            plate: invoice.plate.clone(),
            marked,
            pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        RepositoryError, Resource,
        ports::output::{
            MockAssignmentRepository, MockCarWashInvoiceRepository, MockClientRepository,
            MockParkingInvoiceRepository, MockServiceRepository, MockTariffRepository,
            MockVehicleRepository,
        },
    };
    use crate::domain::{AssignmentId, Cedula, InvoiceId, Plate, TariffId, TicketId};
    use crate::error::CarwashError;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    struct Mocks {
        assignments: MockAssignmentRepository,
        services: MockServiceRepository,
        car_wash: MockCarWashInvoiceRepository,
        parking: MockParkingInvoiceRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                assignments: MockAssignmentRepository::new(),
                services: MockServiceRepository::new(),
                car_wash: MockCarWashInvoiceRepository::new(),
                parking: MockParkingInvoiceRepository::new(),
            }
        }

        fn generator(self) -> InvoiceGenerator {
            let repos = Repositories {
                clients: Arc::new(MockClientRepository::new()),
                vehicles: Arc::new(MockVehicleRepository::new()),
                tariffs: Arc::new(MockTariffRepository::new()),
                services: Arc::new(self.services),
                assignments: Arc::new(self.assignments),
                parking_invoices: Arc::new(self.parking),
                car_wash_invoices: Arc::new(self.car_wash),
            };
            InvoiceGenerator::new(repos, KeyedLocks::new())
        }
    }

    fn plate() -> Plate {
        Plate::new("ABC123").unwrap()
    }

    fn vehicle() -> Vehicle {
        Vehicle {
            plate: plate(),
            make: "Mazda".into(),
            model: "3".into(),
            color: "Rojo".into(),
            owner: Cedula::new(1).unwrap(),
        }
    }

    fn assignment(id: u64, service: u64, billed: bool) -> ServiceAssignment {
        ServiceAssignment {
            id: AssignmentId::new(id),
            plate: plate(),
            service_id: ServiceId::new(service),
            performed_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            billed,
        }
    }

    fn catalog() -> Vec<CarWashService> {
        vec![
            CarWashService {
                id: ServiceId::new(1),
                name: "Wash".into(),
                description: "Lavado".into(),
                tariff: Decimal::from(10),
            },
            CarWashService {
                id: ServiceId::new(2),
                name: "Wax".into(),
                description: "Cera".into(),
                tariff: Decimal::from(15),
            },
        ]
    }

    fn persisted(draft: CarWashInvoiceDraft) -> CarWashInvoice {
        CarWashInvoice {
            id: InvoiceId::new(100),
            client: draft.client,
            plate: draft.plate,
            services: draft.services,
            total: draft.total,
            issued_at: draft.issued_at,
        }
    }

    #[tokio::test]
    async fn nothing_unbilled_persists_nothing() {
        let mut mocks = Mocks::new();
        mocks
            .assignments
            .expect_list_for_vehicle()
            .returning(|_| Ok(vec![assignment(1, 1, true)]));
        mocks.car_wash.expect_create().never();

        let err = mocks
            .generator()
            .generate_car_wash_invoice(&vehicle())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CarwashError::Workflow(WorkflowError::NoUnbilledAssignments { .. })
        ));
    }

    #[tokio::test]
    async fn invoice_totals_unbilled_lines_and_marks_them() {
        let mut mocks = Mocks::new();
        mocks.assignments.expect_list_for_vehicle().returning(|_| {
            Ok(vec![
                assignment(1, 1, false),
                assignment(2, 2, false),
                assignment(3, 1, true),
            ])
        });
        mocks.services.expect_list().returning(|| Ok(catalog()));
        mocks
            .car_wash
            .expect_create()
            .withf(|draft| draft.total == Decimal::from(25) && draft.services.len() == 2)
            .times(1)
            .returning(|draft| Ok(persisted(draft)));
        mocks
            .assignments
            .expect_mark_billed()
            .withf(|_, id| *id != AssignmentId::new(3))
            .times(2)
            .returning(|_, id| Ok(assignment(id.value(), 1, true)));

        let invoice = mocks
            .generator()
            .generate_car_wash_invoice(&vehicle())
            .await
            .unwrap();
        assert_eq!(invoice.total, Decimal::from(25));
        assert!(invoice.is_reconciled());
        assert_eq!(invoice.client, Cedula::new(1).unwrap());
    }

    #[tokio::test]
    async fn missing_catalog_entry_is_unknown_service() {
        let mut mocks = Mocks::new();
        mocks
            .assignments
            .expect_list_for_vehicle()
            .returning(|_| Ok(vec![assignment(7, 99, false)]));
        mocks.services.expect_list().returning(|| Ok(catalog()));
        mocks.car_wash.expect_create().never();

        let err = mocks
            .generator()
            .generate_car_wash_invoice(&vehicle())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CarwashError::Workflow(WorkflowError::UnknownService {
                plate: plate(),
                assignment_id: AssignmentId::new(7),
                service_id: ServiceId::new(99),
            })
        );
    }

    #[tokio::test]
    async fn marking_failure_after_persist_is_an_incident() {
        let mut mocks = Mocks::new();
        mocks.assignments.expect_list_for_vehicle().returning(|_| {
            Ok(vec![assignment(1, 1, false), assignment(2, 2, false)])
        });
        mocks.services.expect_list().returning(|| Ok(catalog()));
        mocks
            .car_wash
            .expect_create()
            .returning(|draft| Ok(persisted(draft)));
        mocks.assignments.expect_mark_billed().returning(|_, id| {
            if id == AssignmentId::new(2) {
                Err(RepositoryError::Transport {
                    resource: Resource::Assignment,
                    reason: "timed out".into(),
                })
            } else {
                Ok(assignment(id.value(), 1, true))
            }
        });

        let err = mocks
            .generator()
            .generate_car_wash_invoice(&vehicle())
            .await
            .unwrap_err();
        assert!(err.is_incident());
        match err {
            CarwashError::Workflow(WorkflowError::InvoiceCreatedBillingIncomplete {
                invoice,
                marked,
                pending,
                ..
            }) => {
                assert_eq!(invoice, InvoiceId::new(100));
                assert_eq!(marked, vec![AssignmentId::new(1)]);
                assert_eq!(pending.len(), 1);
                assert_eq!(pending[0].assignment, AssignmentId::new(2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_failure_leaves_assignments_untouched() {
        let mut mocks = Mocks::new();
        mocks
            .assignments
            .expect_list_for_vehicle()
            .returning(|_| Ok(vec![assignment(1, 1, false)]));
        mocks.services.expect_list().returning(|| Ok(catalog()));
        mocks.car_wash.expect_create().returning(|_| {
            Err(RepositoryError::Validation {
                resource: Resource::CarWashInvoice,
                reason: "rejected".into(),
            })
        });
        mocks.assignments.expect_mark_billed().never();

        let err = mocks
            .generator()
            .generate_car_wash_invoice(&vehicle())
            .await
            .unwrap_err();
        assert!(matches!(err, CarwashError::Repository(_)));
    }

    fn tariff() -> ParkingTariff {
        ParkingTariff {
            id: TariffId::new(1),
            vehicle_type: "Carro".into(),
            hourly_rate: Decimal::from(2),
            fraction: Decimal::ONE,
        }
    }

    fn ticket() -> ParkingTicket {
        ParkingTicket::new(
            TicketId::new(42),
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn parking_invoice_is_priced_by_tariff() {
        let mut mocks = Mocks::new();
        mocks.parking.expect_list().returning(|| Ok(vec![]));
        mocks
            .parking
            .expect_create()
            .withf(|draft| draft.total == Decimal::from(2) && draft.ticket_id == TicketId::new(42))
            .returning(|draft| {
                Ok(ParkingInvoice {
                    id: InvoiceId::new(9),
                    ticket_id: draft.ticket_id,
                    tariff_id: draft.tariff_id,
                    exit_time: draft.exit_time,
                    total: draft.total,
                    issued_at: draft.issued_at,
                })
            });

        let exit = Utc.with_ymd_and_hms(2024, 5, 1, 9, 45, 0).unwrap();
        let invoice = mocks
            .generator()
            .generate_parking_invoice(&ticket(), &tariff(), exit)
            .await
            .unwrap();
        assert_eq!(invoice.total, Decimal::from(2));
    }

    #[tokio::test]
    async fn ticket_cannot_be_invoiced_twice() {
        let mut mocks = Mocks::new();
        mocks.parking.expect_list().returning(|| {
            Ok(vec![ParkingInvoice {
                id: InvoiceId::new(3),
                ticket_id: TicketId::new(42),
                tariff_id: TariffId::new(1),
                exit_time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
                total: Decimal::from(2),
                issued_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            }])
        });
        mocks.parking.expect_create().never();

        let exit = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        let err = mocks
            .generator()
            .generate_parking_invoice(&ticket(), &tariff(), exit)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CarwashError::Workflow(WorkflowError::TicketAlreadyInvoiced {
                ticket: TicketId::new(42),
                invoice: InvoiceId::new(3),
            })
        );
    }

    #[tokio::test]
    async fn exit_before_entry_is_rejected_before_persisting() {
        let mut mocks = Mocks::new();
        mocks.parking.expect_list().returning(|| Ok(vec![]));
        mocks.parking.expect_create().never();

        let exit = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let err = mocks
            .generator()
            .generate_parking_invoice(&ticket(), &tariff(), exit)
            .await
            .unwrap_err();
        assert!(matches!(err, CarwashError::Domain(_)));
    }
}

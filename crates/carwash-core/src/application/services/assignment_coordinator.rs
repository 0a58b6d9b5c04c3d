//! Assignment Coordinator - assigns several services to one vehicle.
//!
//! The workflow:
//! 1. Reject an empty or duplicated selection before any write
//! 2. Create one assignment per service, in order
//! 3. Report every item's outcome; successes are never rolled back
//!
//! A batch runs `Pending -> InFlight -> Completed | PartiallyFailed`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        RepositoryError, WorkflowError, ports::AssignmentRepository, services::KeyedLocks,
    },
    domain::{AssignmentDraft, Plate, ServiceAssignment, ServiceId, Vehicle},
    error::CarwashResult,
};

/// Lifecycle of an assignment batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    InFlight,
    Completed,
    /// At least one item failed. Also used when every item failed.
    PartiallyFailed,
}

/// A service that could not be assigned, with the repository's reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAssignment {
    pub service_id: ServiceId,
    pub error: RepositoryError,
}

/// Per-item result of a finished batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub plate: Plate,
    pub state: BatchState,
    pub created: Vec<ServiceAssignment>,
    pub failed: Vec<FailedAssignment>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.state == BatchState::Completed
    }

    /// Number of services the batch attempted.
    pub fn attempted(&self) -> usize {
        self.created.len() + self.failed.len()
    }

    /// The follow-up selection: only the services that failed, in order.
    pub fn retry_selection(&self) -> Vec<ServiceId> {
        self.failed.iter().map(|f| f.service_id).collect()
    }
}

/// Batch under construction.
struct Batch {
    plate: Plate,
    state: BatchState,
    created: Vec<ServiceAssignment>,
    failed: Vec<FailedAssignment>,
}

impl Batch {
    fn new(plate: Plate) -> Self {
        Self {
            plate,
            state: BatchState::Pending,
            created: Vec::new(),
            failed: Vec::new(),
        }
    }

    fn transition(&mut self, next: BatchState) {
        debug!(plate = %self.plate, from = ?self.state, to = ?next, "Batch state change");
        self.state = next;
    }

    fn finish(mut self) -> BatchOutcome {
        let next = if self.failed.is_empty() {
            BatchState::Completed
        } else {
            BatchState::PartiallyFailed
        };
        self.transition(next);
        BatchOutcome {
            plate: self.plate,
            state: self.state,
            created: self.created,
            failed: self.failed,
        }
    }
}

/// Creates service assignments for a vehicle, one batch at a time.
pub struct AssignmentCoordinator {
    assignments: Arc<dyn AssignmentRepository>,
    locks: KeyedLocks,
}

impl AssignmentCoordinator {
    pub fn new(assignments: Arc<dyn AssignmentRepository>, locks: KeyedLocks) -> Self {
        Self { assignments, locks }
    }

    /// Assign `selection` to `vehicle`.
    ///
    /// Only selection errors are returned as `Err`; item failures are part of
    /// the outcome.
    #[instrument(skip_all, fields(plate = %vehicle.plate, services = selection.len()))]
    pub async fn assign(
        &self,
        vehicle: &Vehicle,
        selection: &[ServiceId],
    ) -> CarwashResult<BatchOutcome> {
        Self::check_selection(&vehicle.plate, selection)?;

        let _guard = self.locks.vehicle(&vehicle.plate).await;

        let mut batch = Batch::new(vehicle.plate.clone());
        batch.transition(BatchState::InFlight);

        for &service_id in selection {
            let draft = AssignmentDraft::new(service_id, Utc::now());
            match self.assignments.create(&vehicle.plate, draft).await {
                Ok(assignment) => {
                    debug!(assignment = %assignment.id, service = %service_id, "Assigned");
                    batch.created.push(assignment);
                }
                Err(error) => {
                    warn!(service = %service_id, error = %error, "Assignment failed");
                    batch.failed.push(FailedAssignment { service_id, error });
                }
            }
        }

        let outcome = batch.finish();
        info!(
            created = outcome.created.len(),
            failed = outcome.failed.len(),
            "Assignment batch finished"
        );
        Ok(outcome)
    }

    /// Re-submit only the failed items of a previous batch.
    pub async fn retry_failed(
        &self,
        vehicle: &Vehicle,
        previous: &BatchOutcome,
    ) -> CarwashResult<BatchOutcome> {
        self.assign(vehicle, &previous.retry_selection()).await
    }

    fn check_selection(plate: &Plate, selection: &[ServiceId]) -> Result<(), WorkflowError> {
        if selection.is_empty() {
            return Err(WorkflowError::NoServicesSelected {
                plate: plate.clone(),
            });
        }
        let mut seen = HashSet::with_capacity(selection.len());
        for &service_id in selection {
            if !seen.insert(service_id) {
                return Err(WorkflowError::DuplicateServiceSelection {
                    plate: plate.clone(),
                    service_id,
                });
            }
        }
        Ok(())
    }
}

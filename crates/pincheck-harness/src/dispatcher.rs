//! Dispatcher: maps a case id onto its probe and records the verdict.
//!
//! [`Harness`] is the single owned context object for a test run: it
//! holds the backend, the registry, the parameter store, the ledger and
//! the last-dispatched marker. One harness expects one operator: there
//! is no internal locking, and dispatching two cases concurrently is
//! outside its contract. Callers serialize, e.g. the control surface
//! takes `&mut self`.

use crate::ledger::{ResultEntry, ResultLedger};
use crate::params::{Field, ParamError, ParameterStore};
use crate::registry::CaseRegistry;
use crate::report::RunReport;
use pincheck_backend::PinctrlBackend;
use pincheck_types::{CaseId, CaseOutcome, CaseStatus, TestParameters};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Rejected dispatch requests. Distinct from a FAILED verdict: nothing
/// ran, nothing was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unsupported case id {0}")]
    UnsupportedCase(usize),
}

/// The owned harness context.
pub struct Harness {
    backend: Arc<dyn PinctrlBackend>,
    registry: CaseRegistry,
    store: ParameterStore,
    ledger: ResultLedger,
    last_dispatched: Option<CaseId>,
}

impl Harness {
    /// Harness over the standard case catalogue.
    pub fn new(backend: Arc<dyn PinctrlBackend>) -> Self {
        Self {
            backend,
            registry: CaseRegistry::standard(),
            store: ParameterStore::new(),
            ledger: ResultLedger::new(),
            last_dispatched: None,
        }
    }

    /// Run one case to completion and record its verdict.
    ///
    /// An out-of-range id performs no backend calls and leaves both the
    /// ledger and the last-dispatched marker untouched. On a valid id the
    /// routine runs exactly once against a parameter snapshot taken here,
    /// so a racing parameter write cannot tear its view.
    pub fn dispatch(&mut self, raw_id: usize) -> Result<CaseOutcome, DispatchError> {
        let id = CaseId::new(raw_id).ok_or(DispatchError::UnsupportedCase(raw_id))?;
        let case = self.registry.get(id);
        let params = self.store.snapshot();
        info!(case = raw_id, name = case.name(), "dispatching");
        let outcome = case.run(self.backend.as_ref(), &params);
        match &outcome {
            CaseOutcome::Confirmed => {
                info!(case = raw_id, name = case.name(), "confirmed");
            }
            CaseOutcome::Violated(reason) => {
                warn!(case = raw_id, name = case.name(), %reason, "violated");
            }
            CaseOutcome::Fault(reason) => {
                warn!(case = raw_id, name = case.name(), %reason, "backend fault");
            }
        }
        self.ledger.record(id, case.name(), outcome.status());
        self.last_dispatched = Some(id);
        Ok(outcome)
    }

    /// Ledger read for one case.
    pub fn result(&self, id: CaseId) -> ResultEntry {
        self.ledger.read(id)
    }

    /// Case id of the most recent valid dispatch.
    pub fn last_dispatched(&self) -> Option<CaseId> {
        self.last_dispatched
    }

    /// Status of the most recently dispatched case; not-run before the
    /// first dispatch.
    pub fn last_result(&self) -> CaseStatus {
        self.last_dispatched
            .map(|id| self.ledger.read(id).status)
            .unwrap_or(CaseStatus::NotRun)
    }

    pub fn set_param(&mut self, field: Field, text: &str) -> Result<(), ParamError> {
        self.store.set_field(field, text)
    }

    pub fn params(&self) -> &TestParameters {
        self.store.get()
    }

    pub fn registry(&self) -> &CaseRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &ResultLedger {
        &self.ledger
    }

    /// Snapshot report over the whole catalogue.
    pub fn report(&self) -> RunReport {
        RunReport::new(&self.registry, &self.ledger)
    }
}

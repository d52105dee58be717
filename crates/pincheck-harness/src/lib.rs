//! Core engine of the pincheck conformance harness.
//!
//! The harness exercises a fixed catalogue of capability claims about a
//! pinmux/GPIO subsystem (configuration round-trips, single-owner
//! exclusivity, release-then-reacquire lifecycles) and records one
//! tri-state verdict per case in a process-lifetime ledger.
//!
//! Flow: an operator writes the [`params::ParameterStore`] through the
//! control surface, then triggers [`Harness::dispatch`] with a case id.
//! The dispatcher resolves the id against the [`registry::CaseRegistry`],
//! runs the bound probe exactly once against a parameter snapshot, and
//! latches the verdict into the [`ledger::ResultLedger`]. Reading a
//! result is idempotent and side-effect free.
//!
//! One in-flight test at a time: the engine has no internal locking and
//! callers must serialize dispatches (the control surface does so by
//! taking `&mut self`).

#![deny(unsafe_code)]

pub mod dispatcher;
pub mod ledger;
pub mod params;
mod probes;
pub mod registry;
pub mod report;

pub use dispatcher::{DispatchError, Harness};
pub use ledger::{ResultEntry, ResultLedger};
pub use params::{Field, ParamError, ParameterStore};
pub use registry::{CaseRegistry, TestCase};
pub use report::{CaseRow, RunReport, RunSummary};

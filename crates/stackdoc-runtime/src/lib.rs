//! Host orchestration and the daily documentation service.
//!
//! `HostOrchestrator` walks configured hosts in order and folds each host's
//! `Result<HostReport, HostFailure>` into a `RunSummary`. `run_service`
//! repeats that pass on a `DailySchedule`.

pub mod orchestrator;
pub mod schedule;
pub mod service;

pub use orchestrator::{
    HostConnector, HostFailure, HostOrchestrator, HostOutcome, HostReport, HttpHostConnector,
    RunSummary,
};
pub use schedule::{resolve_timezone, DailySchedule, DEFAULT_SCHEDULE_TIME, DEFAULT_TIMEZONE};
pub use service::{run_pass, run_service, run_service_until};

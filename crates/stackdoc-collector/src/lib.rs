//! Resource collection for one management host.
//!
//! `ResourceCollector` walks the enabled categories through a `PortainerApi`,
//! degrades optional ones to empty defaults, runs deployment reconciliation
//! and hands back an immutable `CollectedBundle`.

pub mod bundle;
pub mod collector;
pub mod options;

pub use bundle::{BundleBuilder, CollectedBundle, DegradedCategory};
pub use collector::{ResourceCollector, COMPOSE_FILE_UNAVAILABLE};
pub use options::CollectionOptions;

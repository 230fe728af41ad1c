//! Runtime network provisioning
//!
//! Provides:
//! - Driver identifiers and their scope rules
//! - The desired network spec
//! - Driver option building
//! - Check-then-create reconciliation against the runtime

pub mod driver;
pub mod options;
pub mod reconcile;
pub mod spec;

pub use driver::Driver;
pub use options::{OptionSet, build_options};
pub use reconcile::{NetworkReconciler, ObservedFacts};
pub use spec::NetworkSpec;

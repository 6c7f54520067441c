//! phpcq core library: shared check types, gate configuration and the subprocess port.
//!
//! - [`types`]: check categories, per-category results and the run report
//! - [`config`]: `.phpcq.yaml` loading
//! - [`runner`]: [`CommandRunner`] and the blocking [`SystemRunner`]
//! - [`error`]: [`ConfigError`], [`RunnerError`]

pub mod config;
pub mod error;
pub mod runner;
pub mod types;

pub use config::GateConfig;
pub use error::{ConfigError, RunnerError};
pub use runner::{CommandRunner, Invocation, Outcome, SystemRunner};
pub use types::{CheckCategory, CheckResult, Report};

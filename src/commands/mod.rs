//! CLI command implementations.

pub mod batch;
pub mod init;
pub mod run;

pub use batch::{BatchCommand, BatchPlan, BatchSummary};
pub use init::InitCommand;
pub use run::{RunCommand, RunSummary};

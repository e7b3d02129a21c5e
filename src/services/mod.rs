//! External service interactions
//!
//! - Feed loading
//! - Background zap dispatch
//! - Payment backends (external wallet command, dry-run wallet)

pub mod dry_run;
pub mod feed;
pub mod wallet_command;
pub mod zapper;

use crate::config::BackendConfig;
use std::sync::Arc;
use std::time::Duration;

pub use dry_run::DryRunBackend;
pub use feed::{load_feed, sample_feed};
pub use wallet_command::CommandBackend;
pub use zapper::{JobId, PaymentBackend, ProgressReporter, ZapRunner};

/// Build the payment backend described by the config
pub fn build_backend(config: &BackendConfig) -> Arc<dyn PaymentBackend> {
    match config {
        BackendConfig::DryRun {
            balance_sats,
            step_delay_ms,
        } => Arc::new(DryRunBackend::new(
            *balance_sats,
            Duration::from_millis(*step_delay_ms),
        )),
        BackendConfig::Command { program, args } => {
            Arc::new(CommandBackend::new(program.clone(), args.clone()))
        }
    }
}

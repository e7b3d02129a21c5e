//! Simulated wallet for trying the client without spending anything

use crate::model::ZapRequest;
use crate::services::{PaymentBackend, ProgressReporter};
use anyhow::{bail, Result};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// Wallet that walks through the zap pipeline against an in-memory balance
pub struct DryRunBackend {
    balance_sats: Mutex<u64>,
    step_delay: Duration,
}

impl DryRunBackend {
    pub fn new(balance_sats: u64, step_delay: Duration) -> Self {
        Self {
            balance_sats: Mutex::new(balance_sats),
            step_delay,
        }
    }

    pub fn balance_sats(&self) -> u64 {
        match self.balance_sats.lock() {
            Ok(balance) => *balance,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn step(&self, progress: &ProgressReporter, fraction: f32) {
        progress.progress(fraction);
        if !self.step_delay.is_zero() {
            thread::sleep(self.step_delay);
        }
    }
}

impl PaymentBackend for DryRunBackend {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn send_zap(&self, request: &ZapRequest, progress: &ProgressReporter) -> Result<()> {
        // Zap request signed
        self.step(progress, 0.25);
        // Invoice fetched from the recipient's lnurl
        self.step(progress, 0.5);
        // Paying
        self.step(progress, 0.75);

        let amount = request.amount_sats();
        {
            let mut balance = match self.balance_sats.lock() {
                Ok(balance) => balance,
                Err(poisoned) => poisoned.into_inner(),
            };
            if amount > *balance {
                bail!("insufficient funds");
            }
            *balance -= amount;
        }

        tracing::info!(
            amount_sats = amount,
            balance_sats = self.balance_sats(),
            "dry-run zap paid"
        );
        progress.progress(1.0);
        Ok(())
    }
}

//! Operator confirmation delay before the sweep starts.
//!
//! The delay can be cancelled with Ctrl-C. After `SweepGuard::begin_sweep`
//! an interrupt no longer cancels anything: it aborts the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::{BenchError, BenchResult, EXIT_CANCELLED};

const WAITING: u8 = 0;
const CANCELLED: u8 = 1;
const SWEEPING: u8 = 2;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared state between the interrupt handler and the main thread.
#[derive(Debug, Clone, Default)]
pub struct SweepGuard {
    state: Arc<AtomicU8>,
}

impl SweepGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route Ctrl-C to this guard for the rest of the process.
    pub fn install_interrupt_handler(&self) -> BenchResult<()> {
        let guard = self.clone();
        ctrlc::set_handler(move || guard.interrupt())
            .map_err(|e| BenchError::Message(format!("failed to install Ctrl-C handler: {e}")))
    }

    /// What an interrupt does: cancel while waiting, abort once sweeping.
    pub fn interrupt(&self) {
        let prev = self
            .state
            .compare_exchange(WAITING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst);
        if prev == Err(SWEEPING) {
            eprintln!("Interrupted during sweep, aborting; the report is incomplete.");
            std::process::exit(EXIT_CANCELLED);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) == CANCELLED
    }

    /// Leave the cancellable phase. Fails if a cancel already arrived.
    pub fn begin_sweep(&self) -> BenchResult<()> {
        match self
            .state
            .compare_exchange(WAITING, SWEEPING, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) | Err(SWEEPING) => Ok(()),
            Err(_) => Err(BenchError::Cancelled),
        }
    }

    /// Block for `delay`, returning `Cancelled` as soon as an interrupt arrives.
    pub fn countdown(&self, delay: Duration) -> BenchResult<()> {
        let deadline = Instant::now() + delay;
        loop {
            if self.is_cancelled() {
                warn!("cancelled during confirmation delay");
                return Err(BenchError::Cancelled);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            std::thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}

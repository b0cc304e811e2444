#![forbid(unsafe_code)]

//! The producer loop: pull a string, append it under the scene lock, present,
//! wait, repeat.
//!
//! Cancellation is checked under the lock at the start of every iteration and
//! again while waiting, so a stop request is honored within one iteration.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use scrolltext_render::{AppendOutcome, FontEngine};
use tracing::{debug, error, info, warn};
use web_time::Instant;

use crate::cancel::CancelToken;
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::present::Presenter;
use crate::viewer::{Scene, lock};

/// Why the producer loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerExit {
    /// Cancellation was requested.
    Stopped,
    /// The text source returned `None`.
    SourceExhausted,
    /// An update failed; the producer does not retry.
    Failed(ViewerError),
    /// The producer thread panicked.
    Panicked,
}

/// Summary returned when the producer thread is joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    pub exit: ProducerExit,
    /// Blocks drawn.
    pub appended: u64,
    /// Blocks skipped because they could never fit.
    pub dropped: u64,
    pub elapsed: Duration,
}

impl ProducerReport {
    pub(crate) fn panicked() -> Self {
        Self {
            exit: ProducerExit::Panicked,
            appended: 0,
            dropped: 0,
            elapsed: Duration::ZERO,
        }
    }
}

enum Step {
    Appended,
    Dropped,
    Cancelled,
}

/// Run the producer until cancelled, exhausted, or failed.
pub(crate) fn run<E, P, S>(
    scene: Arc<Mutex<Scene<E, P>>>,
    mut source: S,
    token: CancelToken,
    config: ViewerConfig,
) -> ProducerReport
where
    E: FontEngine,
    P: Presenter,
    S: Iterator<Item = String>,
{
    let start = Instant::now();
    let mut appended = 0u64;
    let mut dropped = 0u64;
    info!(interval_ms = config.interval.as_millis() as u64, "producer started");

    let exit = loop {
        let Some(text) = source.next() else {
            break ProducerExit::SourceExhausted;
        };
        match step(&scene, &token, &config, &text) {
            Ok(Step::Appended) => appended += 1,
            Ok(Step::Dropped) => dropped += 1,
            Ok(Step::Cancelled) => break ProducerExit::Stopped,
            Err(err) => {
                error!(%err, "producer update failed");
                break ProducerExit::Failed(err);
            }
        }
        if token.wait_timeout(config.interval) {
            break ProducerExit::Stopped;
        }
    };

    let report = ProducerReport {
        exit,
        appended,
        dropped,
        elapsed: start.elapsed(),
    };
    info!(
        exit = ?report.exit,
        appended,
        dropped,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "producer finished"
    );
    report
}

fn step<E: FontEngine, P: Presenter>(
    scene: &Mutex<Scene<E, P>>,
    token: &CancelToken,
    config: &ViewerConfig,
    text: &str,
) -> Result<Step, ViewerError> {
    {
        let mut guard = lock(scene)?;
        if token.is_cancelled() {
            return Ok(Step::Cancelled);
        }
        let width = config.block_width(guard.ctx.surface().width());
        match guard
            .ctx
            .append_block(text.as_bytes(), config.block_origin_x(), width)?
        {
            AppendOutcome::Appended { lines, y, .. } => {
                debug!(lines, y, text, "block appended");
            }
            AppendOutcome::Dropped { lines } => {
                warn!(lines, text, "block does not fit this screen");
                return Ok(Step::Dropped);
            }
        }
    }

    lock(scene)?.present()?;
    Ok(Step::Appended)
}

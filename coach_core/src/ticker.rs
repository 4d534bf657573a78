//! Cancellable fixed-cadence timers.
//!
//! A [`Ticker`] only decides *when* ticks happen. The event loop that owns
//! the session receives them and applies them, so session state is never
//! touched from the timer task.

use crate::{Error, Result};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// A source of periodic ticks
///
/// Implementations stop ticking when dropped.
pub trait Ticker {
    fn start(&mut self) -> Result<()>;
    /// Stop delivering ticks. Cancelling twice is harmless.
    fn cancel(&mut self);
    fn is_running(&self) -> bool;
}

/// Posts a clone of `event` into a channel every `interval`
///
/// The tick task runs on the current tokio runtime. Deadlines are fixed
/// relative to `start`, so slow receivers delay a tick without shifting
/// the ones after it. The task exits on cancellation or as soon as the
/// receiving side of the channel is gone.
pub struct IntervalTicker<E> {
    interval: Duration,
    sender: UnboundedSender<E>,
    event: E,
    cancel_token: Option<CancellationToken>,
}

impl<E> IntervalTicker<E>
where
    E: Clone + Send + 'static,
{
    pub fn new(interval: Duration, sender: UnboundedSender<E>, event: E) -> Self {
        Self {
            interval,
            sender,
            event,
            cancel_token: None,
        }
    }
}

impl<E> Ticker for IntervalTicker<E>
where
    E: Clone + Send + 'static,
{
    fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }

        let handle = Handle::try_current()
            .map_err(|e| Error::Other(format!("ticker needs a tokio runtime: {}", e)))?;

        let cancel_token = CancellationToken::new();
        handle.spawn(tick_loop(
            self.interval,
            self.sender.clone(),
            self.event.clone(),
            cancel_token.clone(),
        ));

        tracing::debug!("Ticker started at {:?} cadence", self.interval);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
            tracing::debug!("Ticker cancelled");
        }
    }

    fn is_running(&self) -> bool {
        self.cancel_token.is_some()
    }
}

impl<E> Drop for IntervalTicker<E> {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

async fn tick_loop<E>(
    period: Duration,
    sender: UnboundedSender<E>,
    event: E,
    cancel_token: CancellationToken,
) where
    E: Clone,
{
    // First tick one full period after start, not immediately
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if sender.send(event.clone()).is_err() {
                    break;
                }
            }
            _ = cancel_token.cancelled() => break,
        }
    }
}

/// Deterministic ticker for tests: records its lifecycle, never fires on its own
#[derive(Debug, Default)]
pub struct ManualTicker {
    running: bool,
    starts: u32,
    cancels: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    /// Number of cancellations that actually stopped a running ticker
    pub fn cancels(&self) -> u32 {
        self.cancels
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self) -> Result<()> {
        if !self.running {
            self.running = true;
            self.starts += 1;
        }
        Ok(())
    }

    fn cancel(&mut self) {
        if self.running {
            self.running = false;
            self.cancels += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

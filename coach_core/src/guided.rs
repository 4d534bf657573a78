//! A session bound to the timer that drives it.
//!
//! [`GuidedSession`] owns both the [`SessionController`] and its
//! [`Ticker`]: the ticker starts with the session and is cancelled when the
//! session completes or is aborted. Dropping a guided session drops its
//! ticker, which stops it as well. Pausing leaves the ticker running; the
//! controller simply ignores ticks while paused.

use crate::session::{Phase, SessionController};
use crate::ticker::Ticker;
use crate::Result;

pub struct GuidedSession<T: Ticker> {
    controller: SessionController,
    ticker: T,
}

impl<T: Ticker> GuidedSession<T> {
    /// Take ownership of a fresh controller and start its ticker
    pub fn begin(controller: SessionController, mut ticker: T) -> Result<Self> {
        ticker.start()?;
        Ok(Self { controller, ticker })
    }

    /// Apply one timer tick
    ///
    /// Ticks that arrive after the ticker was cancelled (already queued in a
    /// channel, for instance) are dropped.
    pub fn on_tick(&mut self) {
        if self.ticker.is_running() {
            self.controller.tick();
        }
    }

    /// Advance the state machine; completion cancels the ticker
    pub fn advance(&mut self) -> Phase {
        self.controller.advance();
        if self.controller.is_completed() {
            self.ticker.cancel();
        }
        self.controller.phase()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.controller.toggle_pause();
        self.controller.is_paused()
    }

    /// Stop the timer and discard the session
    pub fn abort(self) {
        let Self {
            controller,
            mut ticker,
        } = self;
        ticker.cancel();
        controller.abort();
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }
}

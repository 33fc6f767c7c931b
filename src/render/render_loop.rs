use std::time::Duration;

/// Handle of the running repaint ticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticker {
    started_at: Duration,
    ticks: u64,
}

impl Ticker {
    /// Clock time the ticker started.
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    /// Ticks delivered since the ticker started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Per-surface repaint scheduler.
///
/// Counts running timelines and keeps a ticker alive exactly while that count is non-zero.
/// When the count drops to zero the ticker stops and one final repaint is requested.
#[derive(Clone, Debug, Default)]
pub struct RenderLoop {
    active: usize,
    ticker: Option<Ticker>,
    final_repaint_pending: bool,
    starts: u64,
    ends: u64,
}

impl RenderLoop {
    /// Idle loop: no timelines, no ticker.
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline started running; starts the ticker if needed.
    pub fn note_timeline_started(&mut self, now: Duration) {
        self.active += 1;
        self.starts += 1;
        if self.ticker.is_none() {
            tracing::debug!(at_ms = now.as_millis() as u64, "render ticker started");
            self.ticker = Some(Ticker {
                started_at: now,
                ticks: 0,
            });
        }
    }

    /// A running timeline completed or was interrupted. Returns `true` when this stopped
    /// the ticker.
    pub fn note_timeline_ended(&mut self, now: Duration) -> bool {
        if self.active == 0 {
            tracing::warn!("timeline end noted with no active timelines");
            return false;
        }
        self.active -= 1;
        self.ends += 1;
        if self.active > 0 {
            return false;
        }
        if let Some(t) = self.ticker.take() {
            tracing::debug!(
                at_ms = now.as_millis() as u64,
                ticks = t.ticks,
                "render ticker stopped"
            );
        }
        self.final_repaint_pending = true;
        true
    }

    /// Whether the ticker is running.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Number of running timelines.
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Current ticker, if any.
    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    /// Total start notifications.
    pub fn starts(&self) -> u64 {
        self.starts
    }

    /// Total end notifications.
    pub fn ends(&self) -> u64 {
        self.ends
    }

    /// Whether the ticker is running exactly when timelines are active.
    pub fn invariant_holds(&self) -> bool {
        self.ticker.is_some() == (self.active > 0)
    }

    /// Whether a final repaint is owed since the ticker last stopped.
    pub fn final_repaint_pending(&self) -> bool {
        self.final_repaint_pending
    }

    pub(crate) fn record_tick(&mut self) -> bool {
        match self.ticker.as_mut() {
            Some(t) => {
                t.ticks += 1;
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_final_repaint(&mut self) -> bool {
        std::mem::take(&mut self.final_repaint_pending)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/render_loop.rs"]
mod tests;

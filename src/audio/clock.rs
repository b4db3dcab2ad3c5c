use std::time::{Duration, Instant};

/// Playback position of the bound source, advanced by wall-clock time while
/// running and capped at the source length once that is known.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Stopwatch {
    started_at: Option<Instant>,
    accumulated: Duration,
    limit: Option<Duration>,
}

impl Stopwatch {
    /// Stop at zero for a source of length `limit`.
    pub(super) fn reset(&mut self, limit: Option<Duration>) {
        *self = Self {
            limit,
            ..Self::default()
        };
    }

    pub(super) fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub(super) fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn stop(&mut self, now: Instant) {
        self.accumulated = self.elapsed_at(now);
        self.started_at = None;
    }

    /// Jump to `position`, capped at the limit. A running stopwatch keeps
    /// running from there. Returns the position actually taken.
    pub(super) fn jump_to(&mut self, position: Duration, now: Instant) -> Duration {
        let position = self.cap(position);
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
        position
    }

    pub(super) fn elapsed_at(&self, now: Instant) -> Duration {
        let running = self
            .started_at
            .map_or(Duration::ZERO, |st| now.saturating_duration_since(st));
        self.cap(self.accumulated + running)
    }

    /// Whether the position has reached a known limit.
    pub(super) fn finished_at(&self, now: Instant) -> bool {
        self.limit.is_some_and(|l| self.elapsed_at(now) >= l)
    }

    fn cap(&self, position: Duration) -> Duration {
        match self.limit {
            Some(l) => position.min(l),
            None => position,
        }
    }
}

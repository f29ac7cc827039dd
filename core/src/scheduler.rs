use core::cell::Cell;
use core::time::Duration;

use crate::Timestamp;

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Clock that only moves when told to, for replays and tests.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        let now = self.now.get() + by;
        self.now.set(now);
        now
    }

    /// Moves to `to`, ignoring attempts to go backwards.
    pub fn set(&self, to: Timestamp) -> Timestamp {
        let now = self.now.get().max(to);
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

/// Fixed-timestep clock: converts irregular frame times into evenly spaced tick timestamps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedStep {
    step: Duration,
    max_catch_up: u32,
    anchor: Option<Timestamp>,
    simulated: Duration,
    tick_count: u64,
}

impl FixedStep {
    pub const DEFAULT_MAX_CATCH_UP: u32 = 8;

    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_micros(1)),
            max_catch_up: Self::DEFAULT_MAX_CATCH_UP,
            anchor: None,
            simulated: Duration::ZERO,
            tick_count: 0,
        }
    }

    pub fn from_rate(ticks_per_second: u32) -> Self {
        Self::new(Duration::from_micros(
            1_000_000 / u64::from(ticks_per_second.max(1)),
        ))
    }

    /// Limit on ticks produced by a single [`advance`](Self::advance); older ticks are dropped.
    pub fn with_max_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up.max(1);
        self
    }

    pub const fn step(&self) -> Duration {
        self.step
    }

    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns the ticks that became due by `now`.
    ///
    /// The first call only anchors the clock and yields a single tick at `now`.
    pub fn advance(&mut self, now: Timestamp) -> Ticks {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(now);
            self.tick_count += 1;
            return Ticks {
                anchor: now,
                next: Duration::ZERO,
                step: self.step,
                remaining: 1,
            };
        };

        let elapsed = now.saturating_duration_since(anchor);
        let pending = elapsed.saturating_sub(self.simulated);
        let due = u32::try_from(pending.as_nanos() / self.step.as_nanos()).unwrap_or(u32::MAX);

        if due > self.max_catch_up {
            let dropped = due - self.max_catch_up;
            log::warn!("Fell behind, dropping {} ticks", dropped);
            self.simulated += self.step * dropped;
        }
        let due = due.min(self.max_catch_up);

        let ticks = Ticks {
            anchor,
            next: self.simulated + self.step,
            step: self.step,
            remaining: due,
        };
        self.simulated += self.step * due;
        self.tick_count += u64::from(due);
        ticks
    }
}

#[derive(Clone, Debug)]
pub struct Ticks {
    anchor: Timestamp,
    next: Duration,
    step: Duration,
    remaining: u32,
}

impl Iterator for Ticks {
    type Item = Timestamp;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tick = self.anchor + self.next;
        self.next += self.step;
        self.remaining -= 1;
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ticks {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn manual_clock_is_monotonic() {
        let clock = ManualClock::new(at(100));

        assert_eq!(clock.advance(Duration::from_millis(50)), at(150));
        assert_eq!(clock.set(at(120)), at(150));
        assert_eq!(clock.set(at(400)), at(400));
        assert_eq!(clock.now(), at(400));
    }

    #[test]
    fn first_advance_anchors() {
        let mut clock = FixedStep::new(Duration::from_millis(10));

        let ticks: Vec<_> = clock.advance(at(500)).collect();

        assert_eq!(ticks, [at(500)]);
        assert_eq!(clock.advance(at(505)).len(), 0);
    }

    #[test]
    fn yields_whole_steps_only() {
        let mut clock = FixedStep::new(Duration::from_millis(10));
        clock.advance(at(0));

        let ticks: Vec<_> = clock.advance(at(35)).collect();
        assert_eq!(ticks, [at(10), at(20), at(30)]);

        // the leftover 5ms carries over
        let ticks: Vec<_> = clock.advance(at(41)).collect();
        assert_eq!(ticks, [at(40)]);
        assert_eq!(clock.tick_count(), 5);
    }

    #[test]
    fn sixty_hertz_keeps_pace() {
        let mut clock = FixedStep::from_rate(60);
        clock.advance(at(0));

        let total: usize = (1..=100).map(|frame| clock.advance(at(frame * 10)).len()).sum();

        // 1000ms at 16.666ms per tick
        assert_eq!(total, 60);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut clock = FixedStep::new(Duration::from_millis(10)).with_max_catch_up(3);
        clock.advance(at(0));

        let ticks: Vec<_> = clock.advance(at(100)).collect();

        assert_eq!(ticks, [at(80), at(90), at(100)]);
        assert_eq!(clock.advance(at(109)).len(), 0);
    }
}

//! A bounded polling loop shared by every blocking operation.
//!
//! Receiving, carrier sampling, waiting for a transmission to complete,
//! and the pause between scanner sweeps are all the same shape:
//! run a step, stop early if it says so, otherwise sleep for a fixed
//! interval until a time budget is used up.
use core::ops::ControlFlow;

/// How often to poll and for how long.
///
/// The number of steps taken is `budget / interval` (at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Time slept between steps (in microseconds).
    pub interval_us: u32,
    /// Total time allowed for polling (in microseconds).
    pub budget_us: u64,
}

impl PollSchedule {
    /// Create a schedule from microsecond values.
    pub const fn new(interval_us: u32, budget_us: u64) -> Self {
        Self {
            interval_us,
            budget_us,
        }
    }

    /// Create a schedule from millisecond values.
    ///
    /// An `interval_ms` that overflows a microsecond `u32` saturates.
    pub const fn from_millis(interval_ms: u32, budget_ms: u32) -> Self {
        Self {
            interval_us: interval_ms.saturating_mul(1000),
            budget_us: budget_ms as u64 * 1000,
        }
    }

    /// Create a schedule with an interval in milliseconds and a budget in seconds.
    pub const fn from_secs(interval_ms: u32, budget_s: u32) -> Self {
        Self {
            interval_us: interval_ms.saturating_mul(1000),
            budget_us: budget_s as u64 * 1_000_000,
        }
    }

    /// The number of steps this schedule allows.
    ///
    /// A count that overflows `u32` saturates.
    ///
    /// ```
    /// use rf24link::poll::PollSchedule;
    /// assert_eq!(PollSchedule::from_millis(2, 10).ticks(), 5);
    /// assert_eq!(PollSchedule::from_millis(2, 1).ticks(), 1);
    /// ```
    pub const fn ticks(&self) -> u32 {
        if self.interval_us == 0 {
            return 1;
        }
        let ticks = self.budget_us / self.interval_us as u64;
        if ticks == 0 {
            1
        } else if ticks > u32::MAX as u64 {
            u32::MAX
        } else {
            ticks as u32
        }
    }
}

/// Something that can block the caller for a number of microseconds.
pub(crate) trait Sleep {
    fn sleep_us(&mut self, us: u32);
}

/// Run `step` until it breaks or the `schedule` runs out.
///
/// `ctx` is handed to every `step` and is also what sleeps between steps.
/// A sleep follows every step that did not break.
/// Returns `Ok(None)` when the budget was exhausted.
/// An error from `step` ends polling immediately.
pub(crate) fn poll_until<C, T, E, F>(
    ctx: &mut C,
    schedule: PollSchedule,
    mut step: F,
) -> Result<Option<T>, E>
where
    C: Sleep,
    F: FnMut(&mut C) -> Result<ControlFlow<T>, E>,
{
    for _ in 0..schedule.ticks() {
        if let ControlFlow::Break(value) = step(ctx)? {
            return Ok(Some(value));
        }
        ctx.sleep_us(schedule.interval_us);
    }
    Ok(None)
}

#[cfg(test)]
mod test {
    use super::{poll_until, PollSchedule, Sleep};
    use core::ops::ControlFlow;

    #[derive(Default)]
    struct Clock {
        steps: u32,
        slept_us: u32,
    }

    impl Sleep for Clock {
        fn sleep_us(&mut self, us: u32) {
            self.slept_us += us;
        }
    }

    #[test]
    fn ticks() {
        assert_eq!(PollSchedule::from_millis(1, 100).ticks(), 100);
        assert_eq!(PollSchedule::new(10, 500_000).ticks(), 50_000);
        assert_eq!(PollSchedule::from_millis(2, 0).ticks(), 1);
        assert_eq!(PollSchedule::new(0, 100).ticks(), 1);
        assert_eq!(PollSchedule::from_secs(100, 3).ticks(), 30);
    }

    #[test]
    fn long_budgets_do_not_saturate() {
        // past the 4_294_967 ms that fit a microsecond u32
        assert_eq!(PollSchedule::from_millis(2, 10_000_000).ticks(), 5_000_000);
        assert_eq!(PollSchedule::from_millis(1, 4_294_968).ticks(), 4_294_968);
        assert_eq!(
            PollSchedule::from_millis(1, u32::MAX).budget_us,
            u32::MAX as u64 * 1000
        );
        assert_eq!(PollSchedule::from_millis(1, u32::MAX).ticks(), u32::MAX);
        assert_eq!(PollSchedule::from_secs(100, 5000).ticks(), 50_000);
        assert_eq!(PollSchedule::new(1, u64::MAX).ticks(), u32::MAX);
    }

    #[test]
    fn exhausts_budget() {
        let mut clock = Clock::default();
        let result: Result<Option<()>, ()> =
            poll_until(&mut clock, PollSchedule::from_millis(2, 10), |c| {
                c.steps += 1;
                Ok(ControlFlow::Continue(()))
            });
        assert_eq!(result, Ok(None));
        assert_eq!(clock.steps, 5);
        assert_eq!(clock.slept_us, 10_000);
    }

    #[test]
    fn breaks_early() {
        let mut clock = Clock::default();
        let result: Result<Option<u32>, ()> =
            poll_until(&mut clock, PollSchedule::from_millis(1, 100), |c| {
                c.steps += 1;
                if c.steps == 3 {
                    Ok(ControlFlow::Break(c.steps))
                } else {
                    Ok(ControlFlow::Continue(()))
                }
            });
        assert_eq!(result, Ok(Some(3)));
        // no sleep after the breaking step
        assert_eq!(clock.slept_us, 2_000);
    }

    #[test]
    fn error_stops_polling() {
        let mut clock = Clock::default();
        let result: Result<Option<()>, &str> =
            poll_until(&mut clock, PollSchedule::from_millis(1, 100), |c| {
                c.steps += 1;
                Err("bus")
            });
        assert_eq!(result, Err("bus"));
        assert_eq!(clock.steps, 1);
        assert_eq!(clock.slept_us, 0);
    }
}

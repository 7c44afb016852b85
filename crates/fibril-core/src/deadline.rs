use std::time::Duration;

use web_time::Instant;

/// Time left in the host's current idle slice.
pub trait Deadline {
    fn time_remaining(&self) -> Duration;
}

/// Wall-clock slice starting when it is created.
#[derive(Clone, Copy, Debug)]
pub struct TimeSlice {
    end: Instant,
}

impl TimeSlice {
    pub fn new(budget: Duration) -> Self {
        Self {
            end: Instant::now() + budget,
        }
    }

    pub fn until(end: Instant) -> Self {
        Self { end }
    }
}

impl Deadline for TimeSlice {
    fn time_remaining(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }
}

/// Never asks the scheduler to yield.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

impl<F: Fn() -> Duration> Deadline for F {
    fn time_remaining(&self) -> Duration {
        self()
    }
}

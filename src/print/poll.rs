use std::ops::ControlFlow;
use std::time::Duration;

/// Fixed-interval cooperative poll.
///
/// The check runs once per tick until it breaks; nothing keeps running after
/// [`Poller::run`] returns.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep one interval, run `check` with the tick number, repeat until it breaks
    pub fn run<T, F>(&self, mut check: F) -> T
    where
        F: FnMut(u64) -> ControlFlow<T>,
    {
        let mut tick = 0u64;
        loop {
            std::thread::sleep(self.interval);
            match check(tick) {
                ControlFlow::Break(value) => return value,
                ControlFlow::Continue(()) => tick += 1,
            }
        }
    }
}

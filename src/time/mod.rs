use chrono::{DateTime, Local};

/// Source of the timestamps recorded on run, container and item nodes.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

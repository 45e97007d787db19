pub mod builder;
pub mod event;
pub mod location;

pub use self::builder::{Outcome, TreeBuilder};
pub use self::event::Event;

pub const FRAMEWORK: &str = "Cucumber";
pub const STEP: &str = "Cucumber::Step";
pub const EXAMPLE_ROW: &str = "Cucumber::ScenarioOutline::Example";
pub const PARAMETER: &str = "Cucumber::ScenarioOutline::Parameter";

/// Recorded as `file` when a location cannot be resolved.
pub const UNKNOWN_FILE: &str = "unknown";

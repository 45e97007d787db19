pub mod cargo_env {
    pub const CARGO_PKG_NAME: &'static str = env!("CARGO_PKG_NAME");
}

pub mod common {
    /// Prefix of environment variables read into `Settings`, e.g. `RES_OUTPUT`.
    pub const ENV_PREFIX: &'static str = "RES";
    pub const DEFAULT_JUNIT_OUTPUT: &'static str = "./junit.res";
}

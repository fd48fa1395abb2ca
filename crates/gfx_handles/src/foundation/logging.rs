//! Logging utilities and structured logging support
//!
//! The library itself only emits records through the `log` macros. Binaries
//! and tests pick a backend here; `env_logger` reads `RUST_LOG` as usual.

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default level filter
///
/// `RUST_LOG` is still parsed first, so per-module directives keep working.
pub fn init_with_level(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Initialize logging for unit and integration tests
///
/// Output goes through the test harness capture and repeated calls are
/// ignored, so every test may call this.
pub fn init_for_tests() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_test_init_is_harmless() {
        init_for_tests();
        init_for_tests();
        info!("logging initialised twice without panicking");
    }
}

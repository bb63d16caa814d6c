#![deny(missing_docs)]
//! Shared logging utilities for the glowfic workspace.
//!
//! This crate provides the `engine_*` logging macros used by the core, engine
//! and app crates, and a minimal test initializer for the global logger.
//! The macros forward to the `log` facade re-exported here, so calling crates
//! do not need their own `log` dependency.

#[doc(hidden)]
pub use log as __log;

/// Target used for every record emitted through the `engine_*` macros.
pub const LOG_TARGET: &str = "glowfic";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Only our own records; reqwest/hyper chatter drowns test output.
    let config = ConfigBuilder::new().add_filter_allow_str(LOG_TARGET).build();

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_expand_without_a_logger() {
        super::initialize_for_tests();
        engine_trace!("trace {}", 1);
        engine_debug!("debug {}", 2);
        engine_info!("info {}", 3);
        engine_warn!("warn {}", 4);
        engine_error!("error {}", 5);
    }
}

//! Logger setup for the command line tool

use log::LevelFilter;

/// Initialize `env_logger` at `Debug` when `verbose`, otherwise `Info`.
///
/// `RUST_LOG` overrides the default filter when set. Calling this more than
/// once is harmless; later calls leave the first logger in place.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if builder.try_init().is_ok() {
        log::debug!("Logger initialized at {level:?} level");
    }
}

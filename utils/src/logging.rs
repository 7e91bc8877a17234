use std::env;

use chrono::Local;
use log::LevelFilter;

/// Wire up a stderr logger for binaries and test harnesses embedding this
/// workspace. Level comes from the `LOG_LEVEL` environment variable.
pub fn setup_logging() -> Result<(), fern::InitError> {
    let level = match env::var("LOG_LEVEL").as_deref() {
        Ok("info") => LevelFilter::Info,
        Ok("debug") => LevelFilter::Debug,
        Ok("warn") => LevelFilter::Warn,
        Ok("error") => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}: {}",
                Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

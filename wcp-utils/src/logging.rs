use std::str::FromStr;

/// Sets up global logging via `fern` + `log`, reading the level from
/// `LOG_LEVEL` (default `info`). Mirrors the teacher's
/// `utils::logging::setup_logging`: one dispatcher to stdout, a
/// `{timestamp} [{level}] {target}: {message}` format, no file output.
pub fn setup_logging() -> Result<(), fern::InitError> {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|s| log::LevelFilter::from_str(&s).ok())
        .unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}

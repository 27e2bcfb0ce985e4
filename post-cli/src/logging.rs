use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Логи пишутся в stderr, чтобы не смешиваться с выводом команд.
///
/// `level` уже разрешён в [`crate::settings::Settings`] (`LOG_LEVEL`, затем
/// `RUST_LOG`), поэтому окружение здесь повторно не читается.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

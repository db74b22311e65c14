use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Logs go to stderr so that stdout only carries the report.
pub fn init_logging(level: LogLevel, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.as_tracing_level().into());
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn log_level_parses_from_command_line_names() {
        let parsed: Vec<(LogLevel, Level)> = ["trace", "debug", "INFO", "warn", "error"]
            .iter()
            .map(|name| {
                let level = LogLevel::from_str(name, true).unwrap();
                (level, level.as_tracing_level())
            })
            .collect();

        assert_eq!(
            parsed,
            vec![
                (LogLevel::Trace, Level::TRACE),
                (LogLevel::Debug, Level::DEBUG),
                (LogLevel::Info, Level::INFO),
                (LogLevel::Warn, Level::WARN),
                (LogLevel::Error, Level::ERROR),
            ]
        );
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(LogLevel::from_str("verbose", true).is_err());
    }
}

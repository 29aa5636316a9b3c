use tracing_subscriber::registry::Registry;
use tracing_subscriber::{fmt::time::UtcTime, prelude::*, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging: a console layer plus an optional rolling file
/// layer, both in the configured format. Level precedence is the config
/// value, then RUST_LOG, then "info".
pub fn init_with_config(cfg: &LoggingConfig) {
    let env_filter = if let Some(level) = cfg.level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let mut layers = vec![console_layer(cfg)];
    if cfg.enable_file_logging {
        layers.extend(file_layer(cfg));
    }

    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init();
}

fn console_layer(cfg: &LoggingConfig) -> BoxedLayer {
    let base = tracing_subscriber::fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stdout);
    match cfg.format {
        LogFormat::Json => base.json().with_ansi(false).boxed(),
        LogFormat::Text => base.with_ansi(true).boxed(),
    }
}

/// Rolling file layer per the configured rotation policy. None when the
/// log directory cannot be created; the server keeps running with
/// console logs only.
fn file_layer(cfg: &LoggingConfig) -> Option<BoxedLayer> {
    if std::fs::create_dir_all(&cfg.dir).is_err() {
        eprintln!(
            "Failed to create log directory '{}', continuing with console logs",
            cfg.dir
        );
        return None;
    }

    let rotation = match cfg.rotation.to_lowercase().as_str() {
        "hourly" => tracing_appender::rolling::Rotation::HOURLY,
        "never" => tracing_appender::rolling::Rotation::NEVER,
        _ => tracing_appender::rolling::Rotation::DAILY,
    };
    let appender =
        tracing_appender::rolling::RollingFileAppender::new(rotation, &cfg.dir, &cfg.filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // The writer stops flushing once the guard drops; leak it so it
    // lives as long as the process.
    let _leaked: &'static _ = Box::leak(Box::new(guard));

    let base = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(writer);
    Some(match cfg.format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Text => base.boxed(),
    })
}

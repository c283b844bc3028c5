use std::io::Write;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "studio_engine=debug,studio=info").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`, before the engine library is opened.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        // "[12:04:31] INFO-> message", the console layout the studio has always used.
        builder.format(|buf, record| {
            let stamp = buf.timestamp_seconds().to_string();
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "[{}] {style}{}->{style:#} {}",
                clock_time(&stamp),
                record.level(),
                record.args()
            )
        });

        // A logger installed by the host process wins; keep going without ours.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}

/// Extracts `HH:MM:SS` from an RFC 3339 timestamp, or returns it unchanged.
fn clock_time(stamp: &str) -> &str {
    match stamp.find('T') {
        Some(t) => stamp.get(t + 1..t + 9).unwrap_or(stamp),
        None => stamp,
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use studio_engine::config::DEFAULT_CONFIG_FILE;
use studio_engine::logging::init_logging;
use studio_engine::{session, StudioConfig};

#[derive(Parser, Debug)]
#[command(
    name = "studio",
    version,
    about = "Dynamik Studio launcher: loads the StudioInterface engine and runs it once"
)]
struct Cli {
    /// Configuration file. Defaults apply when it does not exist.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Engine library to load, overriding `library.path`.
    #[arg(long, value_name = "PATH")]
    library: Option<PathBuf>,
    /// Log filter in env_logger syntax, overriding `logging.filter`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
    /// Skip the startup banner.
    #[arg(long)]
    no_banner: bool,
}

impl Cli {
    fn apply(&self, config: &mut StudioConfig) {
        if let Some(library) = &self.library {
            config.library.path = Some(library.clone());
        }
        if let Some(filter) = &self.log {
            config.logging.filter = Some(filter.clone());
        }
        if self.no_banner {
            config.startup.banner = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, origin) = StudioConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    cli.apply(&mut config);

    init_logging(config.logging.to_logging_config());
    origin.log(&cli.config);

    if config.startup.banner {
        print_banner();
    }

    let library = config.library.resolve_path();
    let stats = session::launch(&config.library)
        .with_context(|| format!("running engine from {}", library.display()))?;

    log::info!(
        "session finished ({} initialize, {} execute)",
        stats.initialize_calls,
        stats.execute_calls
    );
    Ok(())
}

fn print_banner() {
    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║          DYNAMIK STUDIO v{:<14}║", env!("CARGO_PKG_VERSION"));
    println!("  ║   engine: StudioInterface              ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();
}

//! heartcheck: heart disease risk prediction form
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartcheck::adapters::sanitize::SanitizingMakeWriter;
use heartcheck::config::AppConfig;
use heartcheck::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Writing logs to the terminal would corrupt the TUI (alternate screen):
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let interactive = std::io::stdout().is_terminal();

    let (writer, guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: a missing directory surfaces as the open error below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SanitizingMakeWriter::new(writer, config.sanitize_max_bytes)),
        )
        .init();

    tracing::info!("Starting heartcheck...");

    // Refuse to show the form unless every artifact loaded.
    let mut app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            eprintln!("❌ {e:#}");
            // Flush the non-blocking writer; exit() skips destructors.
            drop(guard);
            std::process::exit(1);
        }
    };
    app.run()?;

    tracing::info!("heartcheck shutdown complete.");
    drop(guard);
    Ok(())
}

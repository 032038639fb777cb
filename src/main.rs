use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exec_inspector::panel::PanelConfig;
use exec_inspector::{relay, InspectorError};

/// Message relay for a debugger execution-history inspector panel.
///
/// Speaks Content-Length framed JSON on stdin/stdout: host snapshots and UI
/// gestures in, navigation commands and render frames out.
#[derive(Parser)]
#[command(name = "exec-inspector", version)]
struct Cli {
    /// Records per history page.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: u64,

    /// Seconds to wait on an unanswered navigation request before
    /// re-enabling the controls.
    #[arg(long, default_value_t = 10)]
    nav_timeout: u64,
}

fn main() -> Result<(), InspectorError> {
    // Logs go to stderr so stdout stays clean for framed traffic.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PanelConfig {
        page_size: cli.page_size as usize,
        nav_timeout: Duration::from_secs(cli.nav_timeout),
    };
    relay::run_relay(config)
}

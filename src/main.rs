use anyhow::Result;
use clap::Parser;
use term_settings::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to the debug file; stderr only when --log-level or RUST_LOG is set.
    term_settings::debug::init_log_bridge(cli.log_level.map(|l| l.to_level_filter()));
    log::info!("Starting term-settings {}", term_settings::VERSION);

    let code = cli::run(cli.command, &mut std::io::stdout().lock())?;
    log::logger().flush();
    if code != 0 {
        // Nothing holds state that needs dropping at this point.
        std::process::exit(code);
    }
    Ok(())
}

use clap::Parser;
use dbfacade::cli::{self, Cli};
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable JSON
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    info!(command = ?cli.command, "starting dbfacade");

    match cli::run(&cli).and_then(|out| Ok(serde_json::to_string_pretty(&out)?)) {
        Ok(rendered) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

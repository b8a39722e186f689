mod args;
mod repl;
mod simulate;

use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Command, USAGE};
use simulate::SimulationConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match Command::parse() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}\n{USAGE}");
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => println!("{USAGE}"),
        Command::Repl(builder) => {
            let branch = builder.build()?;
            repl::run(branch).await?;
        }
        Command::Simulate { config } => {
            let config = match config {
                Some(path) => {
                    info!(path = %path.display(), "loading simulation config");
                    SimulationConfig::from_path(path)?
                }
                None => SimulationConfig::default(),
            };
            let report = simulate::run(config).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

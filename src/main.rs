use anyhow::Result;
use clap::Parser;
use optimization_orchestrator::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = cli.execute().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

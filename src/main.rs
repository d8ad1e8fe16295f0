use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = launchpad::cli::Cli::parse();
    if let Err(e) = launchpad::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

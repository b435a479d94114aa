use clap::Parser;
use tracing_subscriber::EnvFilter;

use buildkit::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    if let Err(e) = cli::run(cli.command) {
        eprintln!("Error: {}", e);

        // Print the error chain
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }

        std::process::exit(1);
    }
}

use clap::Parser;
use eyre::{Result, eyre};
use todocli::TaskStore;
use todocli::cli::{self, Cli};

fn main() {
    // Setup tracing
    tracing_subscriber::fmt::init();

    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve the store root once and inject it; nothing mutates it later
    let root = match cli.store_path {
        Some(path) => path,
        None => dirs::home_dir().ok_or_else(|| eyre!("Could not determine home directory"))?,
    };

    let store = TaskStore::open(root)?;
    cli::run(&store, cli.command)
}

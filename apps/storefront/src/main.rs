//! # Storefront Shell
//!
//! Runs the storefront against the in-memory commerce backend and drives it
//! from stdin, one command per line. After every command the header and the
//! mounted page are printed.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Load `storefront.toml` and `STOREFRONT_*` overrides
//! 3. Build the commerce backend (seeded unless `--no-seed`)
//! 4. Mount the page for `--path` and load the catalog
//! 5. Read commands until `quit` or end of input

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use storefront::shell::{execute, Reply, ShellCommand, HELP};
use storefront::{init_tracing, App, StoreEvent, StorefrontConfig, Topic};
use storefront_commerce::{CommerceApi, InMemoryCommerce};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Storefront shell")]
struct Cli {
    /// Path to storefront.toml (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial URL
    #[arg(short, long, default_value = "/")]
    path: String,

    /// Start with an empty catalog
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = StorefrontConfig::load(cli.config)?;
    info!(
        shop = %config.shop.name,
        project = %config.commerce.project_key,
        "Configuration loaded"
    );

    let api: Arc<dyn CommerceApi> = if cli.no_seed {
        Arc::new(InMemoryCommerce::empty())
    } else {
        Arc::new(InMemoryCommerce::seeded())
    };

    let app = App::new(api, Arc::new(config));
    app.store().subscribe(Topic::Notice, |_, event| {
        if let StoreEvent::Notice(notice) = event {
            match serde_json::to_string(notice) {
                Ok(json) => println!("notice: {}", json),
                Err(_) => println!("notice: {}", notice.message),
            }
        }
    });

    app.start(&cli.path).await;
    println!("{}", app.render());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match execute(&app, command).await {
            Ok(Reply::Render) => println!("{}", app.render()),
            Ok(Reply::Message(message)) => println!("{}", message),
            Ok(Reply::Quit) => break,
            // Already printed as a notice.
            Err(_) => {}
        }
    }

    info!("Storefront shell closed");
    Ok(())
}

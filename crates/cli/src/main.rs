//! Bookstall CLI - Inspect and edit stored carts.
//!
//! # Usage
//!
//! ```bash
//! # Show the guest cart
//! bs-cli show
//!
//! # Add a book to user u42's cart
//! bs-cli --user u42 add b1 --title "Dune" --price 249.50
//!
//! # Set a quantity, then list every stored cart
//! bs-cli --user u42 set b1 3
//! bs-cli keys
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart and its totals
//! - `add` / `remove` / `inc` / `dec` / `set` / `clear` - Edit the cart
//! - `keys` - List stored cart snapshots
//!
//! Every command loads the selected user's snapshot first and writes
//! changes back to it, exactly as the storefront does.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::Parser;

use bookstall_storefront::config::{LogFormat, StorefrontConfig};
use bookstall_storefront::telemetry;

mod commands;

use commands::cart::CartCommand;

#[derive(Parser)]
#[command(name = "bs-cli")]
#[command(author, version, about = "Bookstall CLI tools")]
struct Cli {
    /// User whose cart to use (omit for the guest cart)
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: CartCommand,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Install a subscriber even when config fails, so the error is reported
    let config = match StorefrontConfig::from_env() {
        Ok(config) => {
            telemetry::init(config.log_format);
            config
        }
        Err(e) => {
            telemetry::init(LogFormat::default());
            return Err(e.into());
        }
    };

    let store = config.open_store()?;
    tracing::debug!(dir = %store.dir().display(), "Opened cart store");

    let mut stdout = std::io::stdout().lock();
    commands::cart::run(cli.command, cli.user.as_deref(), store, &mut stdout)?;
    Ok(())
}

use std::io::{self, BufRead, Write};

use bazaar_app::{
    config::{ApiConfig, LoggingConfig},
    context::AppContext,
    observability::init_subscriber,
};
use clap::{Parser, Subcommand};

mod cart;
mod checkout;

#[derive(Debug, Parser)]
#[command(name = "bazaar", about = "Bazaar cart and checkout CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    api: ApiConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the number of units in the cart
    Count,

    /// Show or edit the cart
    Cart(cart::CartCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        init_subscriber(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.api)
            .await
            .map_err(|error| format!("failed to start session: {error}"))?;

        match self.command {
            Commands::Count => {
                println!("cart_count: {}", context.cart.cart_count());

                Ok(())
            }
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
        }
    }
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` declines.
pub(crate) fn confirm_on_terminal(prompt: &str) -> bool {
    let mut stdout = io::stdout().lock();

    if write!(stdout, "{prompt} [y/N] ")
        .and_then(|()| stdout.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();

    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }

    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

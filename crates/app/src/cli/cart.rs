use std::io;

use bazaar::ids::{LineId, ProductId};
use bazaar_app::{
    carts::{CartView, Removal, Settled, ViewPhase},
    context::AppContext,
};
use clap::{Args, Subcommand};

use super::confirm_on_terminal;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: Option<CartSubcommand>,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart lines and totals
    Show,

    /// Add units of a product
    Add {
        /// Product id
        #[arg(long)]
        product: u64,

        /// Units to add
        #[arg(long, default_value_t = 1u32)]
        quantity: u32,
    },

    /// Set a line's quantity; out-of-range values are clamped
    Set {
        /// Cart line id
        line: u64,

        /// New quantity
        quantity: u32,
    },

    /// Add one unit to a line
    Inc {
        /// Cart line id
        line: u64,
    },

    /// Take one unit off a line
    Dec {
        /// Cart line id
        line: u64,
    },

    /// Remove a line
    Remove {
        /// Cart line id
        line: u64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Remove every line
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Remove lines that can no longer be ordered
    PurgeUnavailable {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let command = command.command.unwrap_or(CartSubcommand::Show);

    if let CartSubcommand::Add { product, quantity } = command {
        let line = context
            .cart
            .add_to_cart(ProductId::new(product), quantity)
            .await
            .map_err(|error| format!("failed to add product: {error}"))?;

        println!(
            "line {}: {} x {}",
            line.id, line.quantity, line.offer.name
        );
        println!("cart_count: {}", context.cart.cart_count());

        return Ok(());
    }

    let mut view = context.cart_view();

    match view.load().await {
        ViewPhase::Failed(message) => return Err(format!("failed to load cart: {message}")),
        ViewPhase::Empty | ViewPhase::Loading | ViewPhase::Ready => {}
    }

    match command {
        CartSubcommand::Show | CartSubcommand::Add { .. } => {}
        CartSubcommand::Set { line, quantity } => {
            let settled = view
                .set_quantity(LineId::new(line), quantity)
                .await
                .map_err(|error| format!("failed to update line {line}: {error}"))?;

            report(settled);
        }
        CartSubcommand::Inc { line } => {
            let settled = view
                .increment(LineId::new(line))
                .await
                .map_err(|error| format!("failed to update line {line}: {error}"))?;

            report(settled);
        }
        CartSubcommand::Dec { line } => {
            let settled = view
                .decrement(LineId::new(line))
                .await
                .map_err(|error| format!("failed to update line {line}: {error}"))?;

            report(settled);
        }
        CartSubcommand::Remove { line, yes } => {
            let removal = view
                .remove(LineId::new(line), |prompt| yes || confirm_on_terminal(prompt))
                .await
                .map_err(|error| format!("failed to remove line {line}: {error}"))?;

            report_removal(removal);
        }
        CartSubcommand::Clear { yes } => {
            let removal = view
                .clear(|prompt| yes || confirm_on_terminal(prompt))
                .await
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            report_removal(removal);
        }
        CartSubcommand::PurgeUnavailable { yes } => {
            let removal = view
                .purge_unavailable(|prompt| yes || confirm_on_terminal(prompt))
                .await
                .map_err(|error| format!("failed to remove unavailable products: {error}"))?;

            report_removal(removal);
        }
    }

    print_view(&view)
}

fn report(settled: Settled) {
    match settled {
        Settled::Confirmed {
            quantity,
            applied: Some(bound),
        } => println!("{bound}; quantity set to {quantity}"),
        Settled::Confirmed {
            quantity,
            applied: None,
        } => println!("quantity set to {quantity}"),
        Settled::Stale => {}
    }
}

fn report_removal(removal: Removal) {
    match removal {
        Removal::Cancelled => println!("cancelled"),
        Removal::Nothing => println!("nothing to remove"),
        Removal::Done => println!("removed"),
    }
}

fn print_view(view: &CartView) -> Result<(), String> {
    match view.phase() {
        ViewPhase::Ready => {
            let cart = view
                .snapshot()
                .map_err(|error| format!("failed to render cart: {error}"))?;

            cart.write_to(io::stdout().lock())
                .map_err(|error| format!("failed to render cart: {error}"))?;
        }
        ViewPhase::Failed(message) => return Err(format!("failed to load cart: {message}")),
        ViewPhase::Empty | ViewPhase::Loading => println!("your cart is empty"),
    }

    println!("cart_count: {}", view.cart_count());

    Ok(())
}

use std::{fmt, io};

use bazaar::checkout::{
    CardDetails, PaymentInput, PaymentMethod, format_card_number, format_expiry,
};
use bazaar_app::context::AppContext;
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentArg {
    /// Debit or credit card
    Card,

    /// Mobile wallet (scan the QR code, then pass --paid)
    WalletQr,

    /// Cash on delivery
    Cash,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(value: PaymentArg) -> Self {
        match value {
            PaymentArg::Card => Self::Card,
            PaymentArg::WalletQr => Self::WalletQr,
            PaymentArg::Cash => Self::CashOnDelivery,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Delivery address
    #[arg(long)]
    address: String,

    /// Contact phone
    #[arg(long)]
    phone: String,

    /// Payment method
    #[arg(long, value_enum)]
    payment: PaymentArg,

    #[command(flatten)]
    card: CardArgs,

    /// Confirm that the wallet payment was completed
    #[arg(long)]
    paid: bool,
}

#[derive(Args)]
struct CardArgs {
    /// Card number (16 digits)
    #[arg(long)]
    card_number: Option<String>,

    /// Card holder name
    #[arg(long)]
    card_holder: Option<String>,

    /// Card expiry, MM/YY
    #[arg(long)]
    card_expiry: Option<String>,

    /// Card verification value
    #[arg(long)]
    card_cvv: Option<String>,
}

impl fmt::Debug for CardArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardArgs")
            .field("card_number", &"**redacted**")
            .field("card_holder", &self.card_holder)
            .field("card_expiry", &"**redacted**")
            .field("card_cvv", &"**redacted**")
            .finish()
    }
}

impl CardArgs {
    fn into_details(self) -> CardDetails {
        CardDetails {
            number: format_card_number(&self.card_number.unwrap_or_default()),
            holder: self.card_holder.unwrap_or_default(),
            expiry: format_expiry(&self.card_expiry.unwrap_or_default()),
            cvv: self.card_cvv.unwrap_or_default(),
        }
    }
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let mut checkout = context
        .checkout()
        .await
        .map_err(|error| format!("{error}; back to the cart"))?;

    checkout
        .cart()
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to render order summary: {error}"))?;

    let method = PaymentMethod::from(args.payment);

    checkout.select_payment_method(method);

    let form = checkout.form_mut();

    form.address = args.address;
    form.phone = args.phone;
    form.payment = Some(match method {
        PaymentMethod::Card => PaymentInput::Card(args.card.into_details()),
        PaymentMethod::WalletQr => PaymentInput::WalletQr {
            confirmed: args.paid,
        },
        PaymentMethod::CashOnDelivery => PaymentInput::CashOnDelivery,
    });

    let reference = checkout
        .submit()
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    println!("order_number: {reference}");
    println!("payment: {method}");
    println!("cart_count: {}", context.cart.cart_count());

    Ok(())
}

//! Pricing

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};

/// Decimal places every derived amount is rounded to.
pub const AMOUNT_SCALE: u32 = 2;

/// Price of `quantity` units at `unit_price`, rounded to [`AMOUNT_SCALE`] places.
pub fn line_total<'a>(unit_price: &Money<'a, Currency>, quantity: u32) -> Money<'a, Currency> {
    let amount = (*unit_price.amount() * Decimal::from(quantity)).round_dp(AMOUNT_SCALE);

    Money::from_decimal(amount, unit_price.currency())
}

/// Sum a list of amounts in `currency`.
///
/// An empty list sums to zero.
///
/// # Errors
///
/// Returns a [`MoneyError`] if any amount is in a different currency.
pub fn total_price<'a>(
    amounts: impl IntoIterator<Item = Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError> {
    amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))
}

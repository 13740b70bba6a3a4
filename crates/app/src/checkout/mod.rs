//! Checkout
//!
//! Controller for the checkout page. It only mounts over a non-empty cart, validates the form
//! locally, and sends the order through the shared cart state.

use std::sync::Arc;

use bazaar::{
    cart::{Cart, CartTotals},
    checkout::{CheckoutForm, CheckoutSubmission, OrderReference, PaymentInput, PaymentMethod},
};
use rusty_money::MoneyError;
use tracing::{info, instrument, warn};

use crate::{
    carts::{CartActionError, CartState},
    store::StoreError,
};

mod errors;

pub use errors::{CheckoutFailure, RedirectToCart};

/// Where a checkout stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Editing the form.
    Collecting,

    Validating,

    /// Waiting for the order service; further submits are refused.
    Submitting,

    /// The order exists.
    Succeeded(OrderReference),
}

/// Checkout page controller.
pub struct CheckoutController {
    state: Arc<CartState>,
    cart: Cart,
    form: CheckoutForm,
    phase: CheckoutPhase,
    last_error: Option<String>,
}

impl CheckoutController {
    /// Load the cart for the order summary.
    ///
    /// # Errors
    ///
    /// Returns a [`RedirectToCart`] when the cart is empty or cannot be loaded.
    #[instrument(skip(state))]
    pub async fn mount(state: Arc<CartState>) -> Result<Self, RedirectToCart> {
        let cart = state.load_cart().await.map_err(|error| match error {
            StoreError::Unauthorized => RedirectToCart::SignedOut,
            other => {
                warn!(error = %other, "failed to load cart for checkout");

                RedirectToCart::LoadFailed(other)
            }
        })?;

        if cart.is_empty() {
            return Err(RedirectToCart::EmptyCart);
        }

        Ok(Self {
            state,
            cart,
            form: CheckoutForm::default(),
            phase: CheckoutPhase::Collecting,
            last_error: None,
        })
    }

    /// Cart being ordered.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Order summary totals.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if line currencies disagree.
    pub fn totals(&self) -> Result<CartTotals, MoneyError> {
        self.cart.totals()
    }

    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CheckoutForm {
        &mut self.form
    }

    /// Message of the last failed submit, kept until the next one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Choose a payment method. Switching methods discards the previous method's input.
    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        let unchanged = self
            .form
            .payment
            .as_ref()
            .is_some_and(|payment| payment.method() == method);

        if !unchanged {
            self.form.payment = Some(PaymentInput::blank(method));
        }
    }

    /// Validate the form and enter [`CheckoutPhase::Submitting`].
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutFailure::Invalid`] for the first failing field, or refuses while an
    /// order is in flight or already placed.
    pub fn begin_submit(&mut self) -> Result<CheckoutSubmission, CheckoutFailure> {
        match &self.phase {
            CheckoutPhase::Submitting | CheckoutPhase::Validating => {
                return Err(CheckoutFailure::InProgress);
            }
            CheckoutPhase::Succeeded(reference) => {
                return Err(CheckoutFailure::AlreadyPlaced(reference.clone()));
            }
            CheckoutPhase::Collecting => {}
        }

        self.phase = CheckoutPhase::Validating;

        match self.form.validate() {
            Ok(submission) => {
                self.phase = CheckoutPhase::Submitting;
                self.last_error = None;

                Ok(submission)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Record the order service's answer.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutFailure::Rejected`]; the form keeps everything the customer entered.
    pub fn finish_submit(
        &mut self,
        outcome: Result<OrderReference, CartActionError>,
    ) -> Result<OrderReference, CheckoutFailure> {
        match outcome {
            Ok(reference) => {
                info!(order = %reference, "checkout complete");

                self.phase = CheckoutPhase::Succeeded(reference.clone());

                Ok(reference)
            }
            Err(error) => Err(self.fail(CheckoutFailure::Rejected(error))),
        }
    }

    /// Validate, submit, and record the outcome.
    ///
    /// # Errors
    ///
    /// See [`CheckoutController::begin_submit`] and [`CheckoutController::finish_submit`].
    pub async fn submit(&mut self) -> Result<OrderReference, CheckoutFailure> {
        let submission = self.begin_submit()?;
        let state = Arc::clone(&self.state);
        let outcome = state.place_order(&submission).await;

        self.finish_submit(outcome)
    }

    fn fail(&mut self, failure: CheckoutFailure) -> CheckoutFailure {
        self.phase = CheckoutPhase::Collecting;
        self.last_error = Some(failure.to_string());

        failure
    }
}

#[cfg(test)]
mod tests {
    use bazaar::{
        checkout::{CheckoutError, PaymentMethod},
        ids::LineId,
    };
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        store::{CartStore, MockCartStore},
        test::{
            InMemoryCartStore, delivery_form, guest_session, signed_in_session, test_card,
            test_line,
        },
    };

    use super::*;

    async fn mounted(store: Arc<dyn CartStore>) -> Result<CheckoutController, RedirectToCart> {
        let state = CartState::start(store, signed_in_session()).await;

        CheckoutController::mount(state).await
    }

    fn mock_with_one_line() -> MockCartStore {
        let mut store = MockCartStore::new();

        store
            .expect_fetch_cart()
            .returning(|| Ok(Cart::with_lines([test_line(1, 1, 1500, 2)], iso::PEN)?));
        store.expect_fetch_count().returning(|| Ok(2));

        store
    }

    #[tokio::test]
    async fn empty_cart_redirects_to_cart() {
        let result = mounted(Arc::new(InMemoryCartStore::new())).await;

        assert!(
            matches!(result, Err(RedirectToCart::EmptyCart)),
            "expected EmptyCart, got {:?}",
            result.err()
        );
    }

    #[tokio::test]
    async fn load_failure_redirects_to_cart() {
        let mut store = MockCartStore::new();

        store.expect_fetch_count().returning(|| Ok(0));
        store
            .expect_fetch_cart()
            .returning(|| Err(StoreError::Transport("timed out".to_string())));

        let result = mounted(Arc::new(store)).await;

        assert!(
            matches!(result, Err(RedirectToCart::LoadFailed(_))),
            "expected LoadFailed, got {:?}",
            result.err()
        );
    }

    #[tokio::test]
    async fn guest_is_sent_back() {
        let mut store = MockCartStore::new();

        store.expect_fetch_cart().never();

        let state = CartState::start(Arc::new(store), guest_session()).await;
        let result = CheckoutController::mount(state).await;

        assert!(
            matches!(result, Err(RedirectToCart::SignedOut)),
            "expected SignedOut, got {:?}",
            result.err()
        );
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_store() -> TestResult {
        let mut store = mock_with_one_line();

        store.expect_submit_order().never();

        let mut checkout = mounted(Arc::new(store)).await?;

        *checkout.form_mut() = CheckoutForm {
            address: "   ".to_string(),
            ..delivery_form(PaymentInput::CashOnDelivery)
        };

        let result = checkout.submit().await;

        assert!(
            matches!(
                result,
                Err(CheckoutFailure::Invalid(CheckoutError::MissingAddress))
            ),
            "expected MissingAddress, got {result:?}"
        );
        assert_eq!(checkout.phase(), &CheckoutPhase::Collecting);
        assert!(checkout.last_error().is_some());

        Ok(())
    }

    #[tokio::test]
    async fn unconfirmed_wallet_payment_is_blocked() -> TestResult {
        let mut store = mock_with_one_line();

        store.expect_submit_order().never();

        let mut checkout = mounted(Arc::new(store)).await?;

        *checkout.form_mut() = delivery_form(PaymentInput::WalletQr { confirmed: false });

        let result = checkout.submit().await;

        assert!(
            matches!(
                result,
                Err(CheckoutFailure::Invalid(
                    CheckoutError::WalletPaymentUnconfirmed
                ))
            ),
            "expected WalletPaymentUnconfirmed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn card_order_sends_only_delivery_details_and_method() -> TestResult {
        let mut store = mock_with_one_line();

        store
            .expect_submit_order()
            .withf(|submission| {
                let debug = format!("{submission:?}");

                submission.method() == PaymentMethod::Card
                    && submission.address() == "Av. Arequipa 1234, Lima"
                    && !debug.contains("4111")
                    && !debug.contains("Rosa Mamani")
                    && !debug.contains("737")
            })
            .times(1)
            .returning(|_| Ok(OrderReference::new("PED-0001")));

        let mut checkout = mounted(Arc::new(store)).await?;

        *checkout.form_mut() = delivery_form(PaymentInput::Card(test_card()));

        let reference = checkout.submit().await?;

        assert_eq!(reference.as_str(), "PED-0001");
        assert_eq!(checkout.phase(), &CheckoutPhase::Succeeded(reference));

        Ok(())
    }

    #[tokio::test]
    async fn successful_order_clears_the_cart_count() -> TestResult {
        let store = Arc::new(InMemoryCartStore::new());

        store.seed([test_line(1, 1, 1500, 2), test_line(2, 2, 900, 1)]);

        let state = CartState::start(store.clone(), signed_in_session()).await;

        assert_eq!(state.cart_count(), 3);

        let mut checkout = CheckoutController::mount(Arc::clone(&state)).await?;

        assert_eq!(checkout.totals()?.distinct_suppliers, 2);

        checkout.select_payment_method(PaymentMethod::WalletQr);
        checkout.form_mut().address = "Jr. Junín 455".to_string();
        checkout.form_mut().phone = "912345678".to_string();
        checkout.form_mut().payment = Some(PaymentInput::WalletQr { confirmed: true });

        checkout.submit().await?;

        assert_eq!(state.cart_count(), 0);
        assert!(!state.is_loading());

        let orders = store.orders();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].method(), PaymentMethod::WalletQr);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_order_keeps_the_form() -> TestResult {
        let mut store = mock_with_one_line();

        store.expect_submit_order().times(1).returning(|_| {
            Err(StoreError::ValidationFailed(
                "Stock insuficiente para Product 1".to_string(),
            ))
        });

        let mut checkout = mounted(Arc::new(store)).await?;
        let form = delivery_form(PaymentInput::Card(test_card()));

        *checkout.form_mut() = form.clone();

        let result = checkout.submit().await;

        assert!(
            matches!(result, Err(CheckoutFailure::Rejected(_))),
            "expected Rejected, got {result:?}"
        );
        assert_eq!(checkout.phase(), &CheckoutPhase::Collecting);
        assert_eq!(checkout.form(), &form);
        assert!(
            checkout
                .last_error()
                .is_some_and(|message| message.contains("Stock insuficiente"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_submit_is_refused() -> TestResult {
        let mut store = mock_with_one_line();

        store.expect_submit_order().never();

        let mut checkout = mounted(Arc::new(store)).await?;

        *checkout.form_mut() = delivery_form(PaymentInput::CashOnDelivery);

        let _submission = checkout.begin_submit()?;

        assert!(
            matches!(checkout.begin_submit(), Err(CheckoutFailure::InProgress)),
            "expected InProgress while submitting"
        );

        checkout.finish_submit(Ok(OrderReference::new("PED-0001")))?;

        let again = checkout.submit().await;

        assert!(
            matches!(again, Err(CheckoutFailure::AlreadyPlaced(ref reference)) if reference.as_str() == "PED-0001"),
            "expected AlreadyPlaced, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn switching_method_discards_card_input() -> TestResult {
        let mut checkout = mounted(Arc::new(mock_with_one_line())).await?;

        checkout.form_mut().payment = Some(PaymentInput::Card(test_card()));
        checkout.select_payment_method(PaymentMethod::Card);

        assert_eq!(
            checkout.form().payment,
            Some(PaymentInput::Card(test_card()))
        );

        checkout.select_payment_method(PaymentMethod::CashOnDelivery);
        checkout.select_payment_method(PaymentMethod::Card);

        assert_eq!(
            checkout.form().payment,
            Some(PaymentInput::blank(PaymentMethod::Card))
        );

        let line = checkout.cart().line(LineId::new(1));

        assert!(line.is_some());

        Ok(())
    }
}

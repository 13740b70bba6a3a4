//! Cart view
//!
//! Screen-level controller for the cart page: loads the cart, shows each line with optimistic
//! quantity edits, and recomputes totals from what is displayed.

use std::sync::Arc;

use bazaar::{
    cart::{Cart, CartError, CartLine, CartTotals},
    ids::LineId,
    quantity::BoundsViolation,
};
use rusty_money::{MoneyError, iso::Currency};
use tracing::{debug, warn};

use crate::{
    carts::{
        CartActionError, CartState,
        line::{EditError, EditRejected, LineEditor, PendingEdit, Settled},
    },
    store::StoreError,
};

/// What the cart page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,

    /// No lines, or nobody signed in.
    Empty,

    Ready,

    /// The cart could not be fetched.
    Failed(String),
}

/// Result of a confirmed bulk or line removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The customer declined the confirmation prompt.
    Cancelled,

    /// There was nothing to remove.
    Nothing,

    /// The server removed the lines and the view was reloaded.
    Done,
}

/// Cart page controller.
pub struct CartView {
    state: Arc<CartState>,
    currency: &'static Currency,
    phase: ViewPhase,
    lines: Vec<LineEditor>,
    epoch: u64,
}

impl CartView {
    /// Create an unloaded view.
    #[must_use]
    pub fn new(state: Arc<CartState>, currency: &'static Currency) -> Self {
        Self {
            state,
            currency,
            phase: ViewPhase::Loading,
            lines: Vec::new(),
            epoch: 0,
        }
    }

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn lines(&self) -> &[LineEditor] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&LineEditor> {
        self.lines.iter().find(|editor| editor.id() == id)
    }

    /// Units in the cart according to the shared count.
    pub fn cart_count(&self) -> u64 {
        self.state.cart_count()
    }

    /// Lines with their displayed quantities.
    pub fn displayed_lines(&self) -> Vec<CartLine> {
        self.lines.iter().map(LineEditor::displayed_line).collect()
    }

    /// Totals of the displayed lines, including edits still awaiting the server.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if line currencies disagree.
    pub fn totals(&self) -> Result<CartTotals, MoneyError> {
        CartTotals::from_lines(&self.displayed_lines(), self.currency)
    }

    /// The displayed lines as a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if line currencies disagree.
    pub fn snapshot(&self) -> Result<Cart, CartError> {
        Cart::with_lines(self.displayed_lines(), self.currency)
    }

    /// Fetch the cart and replace every displayed line.
    ///
    /// Edits begun before the reload settle as [`Settled::Stale`].
    pub async fn load(&mut self) -> &ViewPhase {
        self.epoch += 1;
        self.phase = ViewPhase::Loading;
        self.lines.clear();

        self.phase = match self.state.load_cart().await {
            Ok(cart) if cart.is_empty() => ViewPhase::Empty,
            Ok(cart) => {
                self.currency = cart.currency();
                self.lines = cart.lines().iter().cloned().map(LineEditor::new).collect();

                ViewPhase::Ready
            }
            Err(StoreError::Unauthorized) => {
                debug!("no session, showing an empty cart");

                ViewPhase::Empty
            }
            Err(error) => {
                warn!(%error, "failed to load cart");

                ViewPhase::Failed(error.to_string())
            }
        };

        &self.phase
    }

    /// Show the next allowed quantity for a line.
    ///
    /// # Errors
    ///
    /// Returns an [`EditRejected`] without touching the display when the line is unknown,
    /// already updating, or at its stock ceiling.
    pub fn begin_increment(&mut self, id: LineId) -> Result<PendingEdit, EditRejected> {
        let epoch = self.epoch;
        let editor = self.editable(id)?;
        let next = editor
            .line()
            .bounds()
            .increment(editor.displayed_quantity())?;

        editor.begin(next, None, epoch)
    }

    /// Show the previous allowed quantity for a line.
    ///
    /// # Errors
    ///
    /// Returns an [`EditRejected`] without touching the display when the line is unknown,
    /// already updating, or at its minimum.
    pub fn begin_decrement(&mut self, id: LineId) -> Result<PendingEdit, EditRejected> {
        let epoch = self.epoch;
        let editor = self.editable(id)?;
        let next = editor
            .line()
            .bounds()
            .decrement(editor.displayed_quantity())?;

        editor.begin(next, None, epoch)
    }

    /// Show a typed quantity, clamped into the line's bounds.
    ///
    /// # Errors
    ///
    /// Returns an [`EditRejected`] without touching the display when the line is unknown,
    /// already updating, cannot be ordered, or already shows the clamped quantity.
    pub fn begin_set_quantity(
        &mut self,
        id: LineId,
        requested: u32,
    ) -> Result<PendingEdit, EditRejected> {
        let epoch = self.epoch;
        let editor = self.editable(id)?;
        let clamped = editor.line().bounds().clamp(requested)?;

        editor.begin(clamped.quantity, clamped.applied, epoch)
    }

    /// Apply the server's answer to a pending edit.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Reverted`] when the write failed; the line shows its previous
    /// quantity again.
    pub fn settle(
        &mut self,
        pending: PendingEdit,
        outcome: Result<CartLine, CartActionError>,
    ) -> Result<Settled, EditError> {
        if pending.epoch != self.epoch {
            debug!(line = %pending.line, "discarding edit for a replaced view");

            return Ok(Settled::Stale);
        }

        let Some(editor) = self
            .lines
            .iter_mut()
            .find(|editor| editor.id() == pending.line)
        else {
            return Ok(Settled::Stale);
        };

        match outcome {
            Ok(line) => Ok(Settled::Confirmed {
                quantity: editor.confirm(line),
                applied: pending.applied,
            }),
            Err(source) => {
                editor.revert(pending.previous);

                Err(EditError::Reverted {
                    quantity: pending.previous,
                    source,
                })
            }
        }
    }

    /// Increase a line by one step and write it.
    ///
    /// # Errors
    ///
    /// See [`CartView::begin_increment`] and [`CartView::settle`].
    pub async fn increment(&mut self, id: LineId) -> Result<Settled, EditError> {
        let pending = self.begin_increment(id)?;

        self.commit(pending).await
    }

    /// Decrease a line by one step and write it.
    ///
    /// # Errors
    ///
    /// See [`CartView::begin_decrement`] and [`CartView::settle`].
    pub async fn decrement(&mut self, id: LineId) -> Result<Settled, EditError> {
        let pending = self.begin_decrement(id)?;

        self.commit(pending).await
    }

    /// Set a line to a typed quantity and write it.
    ///
    /// # Errors
    ///
    /// See [`CartView::begin_set_quantity`] and [`CartView::settle`].
    pub async fn set_quantity(&mut self, id: LineId, requested: u32) -> Result<Settled, EditError> {
        let pending = self.begin_set_quantity(id, requested)?;

        self.commit(pending).await
    }

    /// Write a pending edit through the shared cart state and settle it.
    ///
    /// # Errors
    ///
    /// See [`CartView::settle`].
    pub async fn commit(&mut self, pending: PendingEdit) -> Result<Settled, EditError> {
        let state = Arc::clone(&self.state);
        let outcome = state.update_quantity(pending.line, pending.requested).await;

        self.settle(pending, outcome)
    }

    /// Remove a line after `confirm` accepts the prompt, then reload.
    ///
    /// # Errors
    ///
    /// Returns the [`CartActionError`] from the removal; the view is left as it was.
    pub async fn remove(
        &mut self,
        id: LineId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Removal, CartActionError> {
        let prompt = match self.line(id) {
            Some(editor) => format!("Remove {} from the cart?", editor.line().offer.name),
            None => format!("Remove line {id} from the cart?"),
        };

        if !confirm(&prompt) {
            return Ok(Removal::Cancelled);
        }

        self.state.remove_from_cart(id).await?;
        self.load().await;

        Ok(Removal::Done)
    }

    /// Remove every line after `confirm` accepts the prompt, then reload.
    ///
    /// # Errors
    ///
    /// Returns the [`CartActionError`] from the store; the view is left as it was.
    pub async fn clear(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Removal, CartActionError> {
        if self.lines.is_empty() {
            return Ok(Removal::Nothing);
        }

        if !confirm("Remove every product from the cart?") {
            return Ok(Removal::Cancelled);
        }

        self.state.clear_cart().await?;
        self.load().await;

        Ok(Removal::Done)
    }

    /// Remove lines that can no longer be ordered after `confirm` accepts, then reload.
    ///
    /// # Errors
    ///
    /// Returns the [`CartActionError`] from the store; the view is left as it was.
    pub async fn purge_unavailable(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Removal, CartActionError> {
        let unavailable = self
            .lines
            .iter()
            .filter(|editor| !editor.line().is_orderable())
            .count();

        if unavailable == 0 {
            return Ok(Removal::Nothing);
        }

        if !confirm(&format!(
            "Remove {unavailable} product(s) that can no longer be ordered?"
        )) {
            return Ok(Removal::Cancelled);
        }

        self.state.purge_unavailable().await?;
        self.load().await;

        Ok(Removal::Done)
    }

    /// Leave the page. Edits still in flight settle as [`Settled::Stale`].
    pub fn unmount(&mut self) {
        self.epoch += 1;
        self.lines.clear();
        self.phase = ViewPhase::Loading;
    }

    fn editable(&mut self, id: LineId) -> Result<&mut LineEditor, EditRejected> {
        let editor = self
            .lines
            .iter_mut()
            .find(|editor| editor.id() == id)
            .ok_or(EditRejected::UnknownLine(id))?;

        if editor.is_updating() {
            return Err(EditRejected::InFlight(id));
        }

        if !editor.line().offer.available {
            return Err(BoundsViolation::Unavailable.into());
        }

        Ok(editor)
    }
}

#[cfg(test)]
mod tests {
    use bazaar::quantity::AppliedBound;
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{
        session::SessionStore,
        store::{CartStore, MockCartStore},
        test::{InMemoryCartStore, guest_session, signed_in_session, test_line},
    };

    use super::*;

    async fn view_over(store: Arc<dyn CartStore>, session: Arc<dyn SessionStore>) -> CartView {
        let state = CartState::start(store, session).await;
        let mut view = CartView::new(state, iso::PEN);

        view.load().await;

        view
    }

    fn mock_with_cart(lines: Vec<CartLine>) -> MockCartStore {
        let mut store = MockCartStore::new();
        let units: u64 = lines.iter().map(|line| u64::from(line.quantity)).sum();

        store
            .expect_fetch_cart()
            .returning(move || Ok(Cart::with_lines(lines.clone(), iso::PEN)?));
        store.expect_fetch_count().returning(move || Ok(units));

        store
    }

    #[tokio::test]
    async fn loaded_view_shows_multi_supplier_totals() -> TestResult {
        let store = InMemoryCartStore::new();

        store.seed([test_line(1, 1, 500, 1), test_line(2, 2, 200, 3)]);

        let view = view_over(Arc::new(store), signed_in_session()).await;

        assert_eq!(view.phase(), &ViewPhase::Ready);
        assert_eq!(view.lines().len(), 2);

        let totals = view.totals()?;

        assert_eq!(*totals.subtotal.amount(), Decimal::new(1100, 2));
        assert_eq!(totals.distinct_suppliers, 2);
        assert_eq!(totals.total_units, 4);
        assert_eq!(view.cart_count(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn guest_sees_empty_cart_without_a_request() {
        let mut store = MockCartStore::new();

        store.expect_fetch_cart().never();
        store.expect_fetch_count().never();

        let view = view_over(Arc::new(store), guest_session()).await;

        assert_eq!(view.phase(), &ViewPhase::Empty);
    }

    #[tokio::test]
    async fn transport_failure_shows_error_state() {
        let mut store = MockCartStore::new();

        store.expect_fetch_count().returning(|| Ok(0));
        store
            .expect_fetch_cart()
            .returning(|| Err(StoreError::Transport("503 Service Unavailable".to_string())));

        let view = view_over(Arc::new(store), signed_in_session()).await;

        assert!(
            matches!(view.phase(), ViewPhase::Failed(message) if message.contains("503")),
            "expected Failed, got {:?}",
            view.phase()
        );
    }

    #[tokio::test]
    async fn empty_cart_shows_empty_state() {
        let view = view_over(Arc::new(InMemoryCartStore::new()), signed_in_session()).await;

        assert_eq!(view.phase(), &ViewPhase::Empty);
        assert!(view.lines().is_empty());
    }

    #[tokio::test]
    async fn increment_is_shown_before_the_server_answers() -> TestResult {
        let store = mock_with_cart(vec![test_line(1, 1, 1000, 2)]);
        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let pending = view.begin_increment(LineId::new(1))?;
        let editor = view.line(LineId::new(1)).ok_or("missing line")?;

        assert_eq!(pending.requested(), 3);
        assert_eq!(editor.displayed_quantity(), 3);
        assert_eq!(editor.confirmed_quantity(), 2);
        assert!(editor.is_updating());
        assert!(!editor.can_increment());
        assert_eq!(view.totals()?.subtotal, Money::from_minor(3000, iso::PEN));

        let settled = view.settle(pending, Ok(test_line(1, 1, 1000, 3)))?;

        assert_eq!(
            settled,
            Settled::Confirmed {
                quantity: 3,
                applied: None
            }
        );

        let editor = view.line(LineId::new(1)).ok_or("missing line")?;

        assert!(!editor.is_updating());
        assert_eq!(editor.confirmed_quantity(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_restores_previous_quantity_and_totals() -> TestResult {
        let mut store = mock_with_cart(vec![test_line(1, 1, 1000, 2)]);

        store
            .expect_update_line_quantity()
            .times(1)
            .returning(|_, _| Err(StoreError::ValidationFailed("Stock insuficiente".to_string())));

        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let result = view.increment(LineId::new(1)).await;

        match result {
            Err(EditError::Reverted { quantity, source }) => {
                assert_eq!(quantity, 2);
                assert!(source.to_string().contains("Stock insuficiente"));
            }
            other => panic!("expected Reverted, got {other:?}"),
        }

        let editor = view.line(LineId::new(1)).ok_or("missing line")?;

        assert_eq!(editor.displayed_quantity(), 2);
        assert!(!editor.is_updating());
        assert_eq!(view.totals()?.subtotal, Money::from_minor(2000, iso::PEN));

        Ok(())
    }

    #[tokio::test]
    async fn increment_at_stock_ceiling_makes_no_request() -> TestResult {
        let mut store = mock_with_cart(vec![test_line(1, 1, 1000, 5)]);

        store.expect_update_line_quantity().never();

        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let result = view.increment(LineId::new(1)).await;

        assert!(
            matches!(
                result,
                Err(EditError::Rejected(EditRejected::Bounds(
                    BoundsViolation::StockCeilingReached { ceiling: 5 }
                )))
            ),
            "expected StockCeilingReached, got {result:?}"
        );

        let editor = view.line(LineId::new(1)).ok_or("missing line")?;

        assert_eq!(editor.displayed_quantity(), 5);
        assert!(!editor.is_updating());

        Ok(())
    }

    #[tokio::test]
    async fn decrement_at_minimum_makes_no_request() {
        let mut store = mock_with_cart(vec![test_line(1, 1, 1000, 1)]);

        store.expect_update_line_quantity().never();

        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let result = view.decrement(LineId::new(1)).await;

        assert!(
            matches!(
                result,
                Err(EditError::Rejected(EditRejected::Bounds(
                    BoundsViolation::MinimumQuantity { minimum: 1 }
                )))
            ),
            "expected MinimumQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn typed_quantity_is_clamped_to_stock() -> TestResult {
        let store = InMemoryCartStore::new();

        store.seed([test_line(1, 1, 1000, 2)]);

        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let settled = view.set_quantity(LineId::new(1), 40).await?;

        assert_eq!(
            settled,
            Settled::Confirmed {
                quantity: 5,
                applied: Some(AppliedBound::StockCeiling(5))
            }
        );
        assert_eq!(view.cart_count(), 5);

        Ok(())
    }

    #[tokio::test]
    async fn typed_quantity_past_a_reached_ceiling_names_the_bound() {
        let store = mock_with_cart(vec![test_line(1, 1, 1000, 5)]);
        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let result = view.begin_set_quantity(LineId::new(1), 99);

        assert_eq!(
            result,
            Err(EditRejected::AtBound(AppliedBound::StockCeiling(5)))
        );
        assert_eq!(
            result.map_err(|rejected| rejected.to_string()),
            Err("only 5 available; the quantity is unchanged".to_string())
        );

        let line = view.line(LineId::new(1));

        assert!(
            matches!(line, Some(editor) if editor.displayed_quantity() == 5 && !editor.is_updating()),
            "expected an idle line at 5, got {line:?}"
        );
    }

    #[tokio::test]
    async fn typed_quantity_equal_to_display_is_unchanged() {
        let store = mock_with_cart(vec![test_line(1, 1, 1000, 3)]);
        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let result = view.begin_set_quantity(LineId::new(1), 3);

        assert_eq!(result, Err(EditRejected::Unchanged(3)));
    }

    #[tokio::test]
    async fn second_edit_on_an_updating_line_is_refused() -> TestResult {
        let store = mock_with_cart(vec![test_line(1, 1, 1000, 2), test_line(2, 1, 500, 1)]);
        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let _pending = view.begin_increment(LineId::new(1))?;

        let again = view.begin_decrement(LineId::new(1));

        assert_eq!(again, Err(EditRejected::InFlight(LineId::new(1))));

        let other = view.begin_increment(LineId::new(2))?;

        assert_eq!(other.requested(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn edits_settled_after_unmount_are_ignored() -> TestResult {
        let store = mock_with_cart(vec![test_line(1, 1, 1000, 2)]);
        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let pending = view.begin_increment(LineId::new(1))?;

        view.unmount();

        let settled = view.settle(
            pending,
            Err(CartActionError::Store(StoreError::Transport(
                "timed out".to_string(),
            ))),
        )?;

        assert_eq!(settled, Settled::Stale);
        assert!(view.lines().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn declined_removal_makes_no_request() -> TestResult {
        let mut store = mock_with_cart(vec![test_line(1, 1, 1000, 2)]);

        store.expect_remove_line().never();

        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let mut asked = String::new();

        let removal = view
            .remove(LineId::new(1), |prompt| {
                asked = prompt.to_string();

                false
            })
            .await?;

        assert_eq!(removal, Removal::Cancelled);
        assert!(asked.contains("Product 1"), "unexpected prompt: {asked}");
        assert_eq!(view.lines().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn confirmed_removal_reloads_and_resyncs_count() -> TestResult {
        let store = Arc::new(InMemoryCartStore::new());

        store.seed([test_line(1, 1, 1000, 2), test_line(2, 2, 500, 3)]);

        let mut view = view_over(store.clone(), signed_in_session()).await;

        assert_eq!(view.cart_count(), 5);

        let removal = view.remove(LineId::new(1), |_| true).await?;

        assert_eq!(removal, Removal::Done);
        assert_eq!(view.lines().len(), 1);
        assert_eq!(view.cart_count(), 3);
        assert_eq!(view.cart_count(), store.units());

        Ok(())
    }

    #[tokio::test]
    async fn clear_leaves_empty_state_and_zero_count() -> TestResult {
        let store = InMemoryCartStore::new();

        store.seed([test_line(1, 1, 1000, 2), test_line(2, 2, 500, 3)]);

        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let removal = view.clear(|_| true).await?;

        assert_eq!(removal, Removal::Done);
        assert_eq!(view.phase(), &ViewPhase::Empty);
        assert_eq!(view.cart_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn purge_without_unavailable_lines_does_nothing() -> TestResult {
        let mut store = mock_with_cart(vec![test_line(1, 1, 1000, 2)]);

        store.expect_purge_unavailable().never();

        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let removal = view.purge_unavailable(|_| true).await?;

        assert_eq!(removal, Removal::Nothing);

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_lines_cannot_be_edited() -> TestResult {
        let mut withdrawn = test_line(1, 1, 1000, 2);
        withdrawn.offer.available = false;

        let store = mock_with_cart(vec![withdrawn]);
        let mut view = view_over(Arc::new(store), signed_in_session()).await;

        let result = view.begin_decrement(LineId::new(1));

        assert_eq!(
            result,
            Err(EditRejected::Bounds(BoundsViolation::Unavailable))
        );

        Ok(())
    }
}

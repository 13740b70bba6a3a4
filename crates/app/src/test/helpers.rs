//! Test Helpers

use std::sync::Arc;

use bazaar::{
    cart::CartLine,
    checkout::{CardDetails, CheckoutForm, PaymentInput},
    ids::{LineId, ProductId, SupplierId},
    products::{Offer, Supplier},
    quantity::QuantityBounds,
};
use rusty_money::{Money, iso};

use crate::session::{BearerToken, SessionStore, SessionIdentity, StaticSession};

pub(crate) fn signed_in_session() -> Arc<dyn SessionStore> {
    let token = BearerToken::new("test-token");

    match token {
        Some(token) => Arc::new(StaticSession::signed_in(
            token,
            Some(SessionIdentity {
                user_id: 1,
                name: "cliente@example.com".to_string(),
            }),
        )),
        None => Arc::new(StaticSession::guest()),
    }
}

pub(crate) fn guest_session() -> Arc<dyn SessionStore> {
    Arc::new(StaticSession::guest())
}

/// Offer for product `id`, priced in PEN minor units.
pub(crate) fn test_offer(
    id: u64,
    supplier: u64,
    minor_price: i64,
    minimum: u32,
    stock: u32,
) -> Offer {
    Offer {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        unit_price: Money::from_minor(minor_price, iso::PEN),
        bounds: QuantityBounds::new(minimum, stock),
        unit_of_measure: "unit".to_string(),
        available: true,
        supplier: Supplier {
            id: SupplierId::new(supplier),
            name: format!("Supplier {supplier}"),
        },
    }
}

/// Line `id` for product `id * 10`, orderable between 1 and 5 units.
pub(crate) fn test_line(id: u64, supplier: u64, minor_price: i64, quantity: u32) -> CartLine {
    let mut offer = test_offer(id * 10, supplier, minor_price, 1, 5);

    offer.name = format!("Product {id}");

    CartLine {
        id: LineId::new(id),
        offer,
        quantity,
        added_at: None,
    }
}

pub(crate) fn delivery_form(payment: PaymentInput) -> CheckoutForm {
    CheckoutForm {
        address: "Av. Arequipa 1234, Lima".to_string(),
        phone: "987654321".to_string(),
        payment: Some(payment),
    }
}

pub(crate) fn test_card() -> CardDetails {
    CardDetails {
        number: "4111 1111 1111 1111".to_string(),
        holder: "Rosa Mamani".to_string(),
        expiry: "08/28".to_string(),
        cvv: "737".to_string(),
    }
}

//! Wire format of the cart and order endpoints.

use bazaar::{
    cart::{Cart, CartError, CartLine},
    checkout::{CheckoutSubmission, OrderReference, PaymentMethod},
    ids::{LineId, ProductId, SupplierId},
    products::{Offer, Supplier},
    quantity::QuantityBounds,
};
use jiff::civil::DateTime;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// `{success, message, data}` wrapper used by every cart endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default = "default_true")]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartSummaryDto {
    #[serde(default)]
    pub items: Vec<CartLineDto>,

    #[serde(rename = "cantidadProductos", default)]
    pub total_units: Option<u64>,
}

impl CartSummaryDto {
    /// Units across every line, summed locally when the server omits it.
    pub(crate) fn units(&self) -> u64 {
        self.total_units.unwrap_or_else(|| {
            self.items
                .iter()
                .map(|item| u64::from(item.quantity))
                .sum()
        })
    }

    pub(crate) fn into_cart(self, currency: &'static Currency) -> Result<Cart, CartError> {
        let lines: Vec<CartLine> = self
            .items
            .into_iter()
            .map(|item| item.into_line(currency))
            .collect();

        Cart::with_lines(lines, currency)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartLineDto {
    pub id: LineId,

    #[serde(rename = "productoId")]
    pub product_id: ProductId,

    #[serde(rename = "nombreProducto", default)]
    pub product_name: String,

    #[serde(rename = "precioUnitario")]
    pub unit_price: Decimal,

    #[serde(rename = "unidadMedida", default)]
    pub unit_of_measure: Option<String>,

    #[serde(rename = "cantidad")]
    pub quantity: u32,

    #[serde(rename = "cantidadMinima", default)]
    pub minimum_quantity: Option<u32>,

    #[serde(rename = "stockDisponible", default)]
    pub stock: Option<u32>,

    #[serde(rename = "proveedorId")]
    pub supplier_id: SupplierId,

    #[serde(rename = "nombreEmpresa", default)]
    pub supplier_name: String,

    #[serde(rename = "disponible", default = "default_true")]
    pub available: bool,

    #[serde(rename = "fechaAgregado", default)]
    pub added_at: Option<DateTime>,
}

impl CartLineDto {
    /// Missing stock caps the line at what it already holds.
    pub(crate) fn into_line(self, currency: &'static Currency) -> CartLine {
        let minimum = self.minimum_quantity.unwrap_or(1);
        let ceiling = self.stock.unwrap_or(self.quantity);

        CartLine {
            id: self.id,
            offer: Offer {
                id: self.product_id,
                name: self.product_name,
                unit_price: Money::from_decimal(self.unit_price, currency),
                bounds: QuantityBounds::new(minimum, ceiling),
                unit_of_measure: self
                    .unit_of_measure
                    .unwrap_or_else(|| "unit".to_string()),
                available: self.available,
                supplier: Supplier {
                    id: self.supplier_id,
                    name: self.supplier_name,
                },
            },
            quantity: self.quantity,
            added_at: self.added_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddLineRequest {
    #[serde(rename = "productoId")]
    pub product_id: ProductId,

    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateQuantityRequest {
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

/// Only the delivery details and the method tag leave the client.
#[derive(Debug, Serialize)]
pub(crate) struct CheckoutRequest<'a> {
    #[serde(rename = "direccionEntrega")]
    pub address: &'a str,

    #[serde(rename = "telefonoContacto")]
    pub phone: &'a str,

    #[serde(rename = "metodoPago")]
    pub method: PaymentMethod,
}

impl<'a> From<&'a CheckoutSubmission> for CheckoutRequest<'a> {
    fn from(submission: &'a CheckoutSubmission) -> Self {
        Self {
            address: submission.address(),
            phone: submission.phone(),
            method: submission.method(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutResponse {
    #[serde(default = "default_true")]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(rename = "numeroPedido", default)]
    pub reference: Option<OrderReference>,
}

fn default_true() -> bool {
    true
}

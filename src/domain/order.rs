use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::{AccountId, Id, MixId, ProductId};

pub type OrderId = Id<Order>;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pendiente,
    Pagado,
    #[serde(rename = "en proceso")]
    EnProceso,
    Despachado,
    Completado,
    Cancelado,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub const ALL: [Self; 6] = [
        Self::Pendiente,
        Self::Pagado,
        Self::EnProceso,
        Self::Despachado,
        Self::Completado,
        Self::Cancelado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Pagado => "pagado",
            Self::EnProceso => "en proceso",
            Self::Despachado => "despachado",
            Self::Completado => "completado",
            Self::Cancelado => "cancelado",
        }
    }

    /// Dispatched or delivered; stock can no longer be returned through cancellation.
    pub fn is_shipped(self) -> bool {
        matches!(self, Self::Despachado | Self::Completado)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A priced order line: exactly one of a product or a mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OrderLine {
    Product {
        product: ProductId,
        quantity: Decimal,
        price_at_purchase: Decimal,
    },
    Mix {
        mix: MixId,
        quantity: Decimal,
        price_at_purchase: Decimal,
    },
}

impl OrderLine {
    pub fn quantity(&self) -> Decimal {
        match self {
            Self::Product { quantity, .. } | Self::Mix { quantity, .. } => *quantity,
        }
    }

    pub fn price_at_purchase(&self) -> Decimal {
        match self {
            Self::Product { price_at_purchase, .. } | Self::Mix { price_at_purchase, .. } => {
                *price_at_purchase
            }
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price_at_purchase() * self.quantity()
    }
}

/// Stock taken from (or owed back to) one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockMove {
    pub product: ProductId,
    pub quantity: Decimal,
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: AccountId,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub status: OrderStatus,
    /// Stock currently deducted on behalf of this order. Cancellation returns
    /// exactly these moves.
    pub held_stock: Vec<StockMove>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for storing a priced order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub owner: AccountId,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
}

/// Status change applied by the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPatch {
    pub status: OrderStatus,
}

/// A requested order line, as received from the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum LineRequest {
    Product { product_id: String, quantity: Decimal },
    Mix { mix_id: String, quantity: Decimal },
}

impl LineRequest {
    pub fn product(product_id: impl ToString, quantity: Decimal) -> Self {
        Self::Product {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    pub fn mix(mix_id: impl ToString, quantity: Decimal) -> Self {
        Self::Mix {
            mix_id: mix_id.to_string(),
            quantity,
        }
    }
}

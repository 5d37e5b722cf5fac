//! Simulated checkout types.
//!
//! No payment is taken. Checkout snapshots the cart into a [`Receipt`]
//! which the download page shows afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chinoeffy_core::{Cart, Price, ProductId, Quantity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment option picked on the checkout page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    Crypto,
}

impl PaymentMethod {
    /// Every option in display order.
    pub const ALL: [Self; 3] = [Self::Card, Self::Paypal, Self::Crypto];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit / Debit Card",
            Self::Paypal => "PayPal",
            Self::Crypto => "Cryptocurrency",
        }
    }

    /// Parse a query value, falling back to card.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Paypal => write!(f, "paypal"),
            Self::Crypto => write!(f, "crypto"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "crypto" => Ok(Self::Crypto),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: Quantity,
    pub line_total: Price,
}

/// Record of a completed (simulated) checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub reference: Uuid,
    pub placed_at: DateTime<Utc>,
    pub email: String,
    pub payment_method: PaymentMethod,
    pub lines: Vec<OrderLine>,
    pub total: Price,
}

impl Receipt {
    /// Snapshot `cart` as a receipt placed now.
    #[must_use]
    pub fn from_cart(cart: &Cart, email: &str, payment_method: PaymentMethod) -> Self {
        Self {
            reference: Uuid::new_v4(),
            placed_at: Utc::now(),
            email: email.trim().to_owned(),
            payment_method,
            lines: cart
                .items()
                .iter()
                .map(|item| OrderLine {
                    id: item.id,
                    name: item.name.clone(),
                    image: item.image.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total(),
                })
                .collect(),
            total: cart.total(),
        }
    }

    /// Short reference shown to the customer.
    #[must_use]
    pub fn short_reference(&self) -> String {
        self.reference
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect::<String>()
            .to_uppercase()
    }
}

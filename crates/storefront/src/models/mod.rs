//! Domain models for storefront.

pub mod order;
pub mod session;

pub use order::{OrderLine, PaymentMethod, Receipt};
pub use session::keys as session_keys;

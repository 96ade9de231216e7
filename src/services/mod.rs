//! Application services, each built over the shared document store handle.
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod diagnostics;
pub mod publisher;
pub mod seed;

pub use cart::{CartManager, CartView};
pub use catalog::CatalogReader;
pub use checkout::{CheckoutProcessor, CheckoutReceipt};
pub use publisher::EventPublisher;

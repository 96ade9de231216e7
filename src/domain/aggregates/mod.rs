//! Aggregates module
pub mod category;
pub mod product;
pub mod cart;
pub mod order;

pub use category::Category;
pub use product::Product;
pub use cart::{Cart, CartItem};
pub use order::{Customer, Order, OrderItem, OrderStatus};

//! Domain models for the storefront.

pub mod account;
pub mod cart;
pub mod session;

pub use account::Account;
pub use cart::{Cart, CartLine};
pub use session::{CurrentUser, session_keys};

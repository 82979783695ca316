//! Products domain module (tracked items with an owning participant).
//!
//! Pure domain types only (no IO, no HTTP, no storage).

pub mod product;

pub use product::{Product, ProductView};

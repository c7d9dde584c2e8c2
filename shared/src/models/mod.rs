//! Persistent domain models outside the order aggregate

pub mod product;

pub use product::Product;

//! Shared element traits for the ndref crates.
//!
//! `ndref-view` and `ndref-kernel` are generic over these traits, so external
//! scalar types (prime-field and `Z2^k` ring elements used by secure
//! computation layers) can be stored in arrays by implementing the standard
//! library traits the blanket impls ask for.

pub mod element;

pub use element::{Element, Numeric, Pod};

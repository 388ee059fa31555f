//! Value types and XML utilities shared across the crate.

pub mod color;
pub mod unit;
pub mod xml;

pub use color::{Color, RGBColor};
pub use unit::{HalfPoints, Length, SignedTwips, Twips, Uom};

pub mod colors;
pub mod date;
pub mod formatting;

pub use formatting::{format_clock, format_duration, format_weight};

//! Icon container loading for the traydemo status item.
//!
//! Reads Apple ICNS containers into an [`IconSet`], the ordered list of image
//! entries stored in the file. Consumers display the last entry, which in
//! icon bundles produced by `iconutil` is the highest-fidelity one.

mod error;
mod icns;
mod set;

pub use error::IconError;
pub use icns::{load_icns, parse_icns};
pub use set::{IconEntry, IconFormat, IconSet};

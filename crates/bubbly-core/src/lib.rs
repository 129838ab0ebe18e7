#![forbid(unsafe_code)]

//! Asset record model + sanitization for the bubbly risk chart (headless).
//!
//! This crate is the input adapter: it decodes the JSON payload a risk
//! endpoint returns, sanitizes it record by record, ranks the records by
//! volume, applies a rank selection, and scales volumes to bubble radii. The
//! layout engine (`flotsam`) only ever sees the cleaned, filtered output.

pub mod config;
pub mod error;
pub mod records;
pub mod select;

pub use config::ChartConfig;
pub use error::{Error, Result};
pub use records::{AssetRecord, BubbleSpec, RawAsset, parse_assets, sanitize_records, scale_radii};
pub use select::Selection;

//! Media host integration for uploaded report files.

pub mod client;
pub mod error;
pub mod urls;

pub use client::{MediaClient, Upload};
pub use error::MediaError;
pub use urls::{ParsedMediaUrl, Transform, parse_delivery_url};

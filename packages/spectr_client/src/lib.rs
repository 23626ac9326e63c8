//! Client for the spectr scan export service.
//!
//! The pipeline only depends on the [`ScanSource`] trait; [`SpectrClient`]
//! is the HTTP implementation used in production.

mod client;
mod error;
mod source;
mod wire;

pub use client::SpectrClient;
pub use error::ExportError;
pub use source::{ScanFuture, ScanSource};

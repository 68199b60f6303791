//! Shared types for the YoBit API.

pub mod common;
mod params;

pub use common::*;
pub use params::RequestParams;

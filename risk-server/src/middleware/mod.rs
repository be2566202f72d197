//! Request extractors

pub mod json;
pub mod session;

pub use json::AppJson;

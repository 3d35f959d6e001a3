//! Utility modules: request bounding.

pub mod timeout;

pub use timeout::bounded;

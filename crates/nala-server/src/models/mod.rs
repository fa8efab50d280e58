//! API request/response models

pub mod dashboard;

pub use dashboard::*;

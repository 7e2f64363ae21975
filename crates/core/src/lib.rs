//! Domain types and rules for the media tracker.
//!
//! This crate has no internal dependencies so it can be shared by the
//! repository layer and the HTTP server alike.

pub mod accounts;
pub mod catalogue;
pub mod error;
pub mod media;
pub mod patch;
pub mod rating;
pub mod types;

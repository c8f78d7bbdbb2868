//! HTTP handlers for the public blog API.

pub mod posts;
pub mod users;

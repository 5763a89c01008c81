//! Firestore over its REST API.

mod client;
mod credentials;
mod value;

pub use client::*;
pub use credentials::*;
pub use value::*;

//! Configuration loader and schema types.
//!
//! This module exposes the settings the server is started with and helpers
//! to load them from the JSON config file and the environment.

mod load;
mod schema;

pub use load::*;
pub use schema::*;

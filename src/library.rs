//! Track library: the on-disk store, the in-memory catalog snapshot and the
//! name filter that guards every path built from request input.

mod catalog;
mod model;
mod sanitize;
mod store;

pub use catalog::Catalog;
pub use model::{Track, TrackMedia};
pub use sanitize::is_allowed_name;
pub use store::{StoreError, TrackStore};

#[cfg(test)]
mod tests;

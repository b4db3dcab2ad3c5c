//! Track catalog: the `Track` model and the one-time JSON loader.

mod load;
mod model;

pub use load::{CatalogError, CatalogLoad, spawn_catalog_load};
pub use model::{Track, TrackId};

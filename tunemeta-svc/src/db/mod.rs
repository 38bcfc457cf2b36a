//! Database access for tunemeta-svc

pub mod songs;

pub use songs::SqliteSongStore;

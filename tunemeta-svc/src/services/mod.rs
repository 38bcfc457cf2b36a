//! Song metadata services
//!
//! - `year_parser` / `candidate_selector`: pure selection logic
//! - `resolver`: store → catalog → select → persist orchestration
//! - `gateway`: store and catalog interfaces
//! - `musicbrainz_client`: catalog implementation over the MusicBrainz API

pub mod candidate_selector;
pub mod gateway;
pub mod musicbrainz_client;
pub mod resolver;
pub mod year_parser;

pub use gateway::{CatalogError, CatalogGateway, SongStore, StoreError};
pub use musicbrainz_client::MusicBrainzClient;
pub use resolver::{PersistMode, Resolution, Resolver};

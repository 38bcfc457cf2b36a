//! Data models for song metadata resolution

pub mod candidate;
pub mod song;

pub use candidate::{Candidate, Release, Tag};
pub use song::{Selection, SongRecord};

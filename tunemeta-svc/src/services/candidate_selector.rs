//! Best-match selection among ambiguous catalog candidates
//!
//! The earliest known release is taken as the recording's original release;
//! later releases tend to be reissues and compilations. When no year is
//! known anywhere, input order (the catalog's relevance ranking) decides.

use crate::models::song::UNKNOWN;
use crate::models::{Candidate, Selection};
use crate::services::year_parser::extract_year;

/// Pick album, year, duration and genre from `candidates`
///
/// Returns `None` only when `candidates` is empty. Pure and deterministic:
/// the same list in the same order always yields the same selection.
pub fn select(candidates: &[Candidate]) -> Option<Selection> {
    let best = earliest_by(candidates, earliest_release_year)?;
    let release = earliest_by(&best.releases, |r| extract_year(r.date.as_deref()));

    let album = release
        .and_then(|r| r.title.as_deref())
        .filter(|title| !title.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string();
    let year = release.and_then(|r| extract_year(r.date.as_deref()));

    Some(Selection {
        album,
        year,
        duration_ms: best.duration_ms,
        genre: genre(best, candidates),
    })
}

/// Smallest parseable release year of a candidate
fn earliest_release_year(candidate: &Candidate) -> Option<i32> {
    candidate
        .releases
        .iter()
        .filter_map(|r| extract_year(r.date.as_deref()))
        .min()
}

/// Item with the smallest year, first such item on ties; falls back to the
/// first item when no year parses at all
fn earliest_by<T>(items: &[T], year_of: impl Fn(&T) -> Option<i32>) -> Option<&T> {
    let mut best: Option<(&T, i32)> = None;

    for item in items {
        if let Some(year) = year_of(item) {
            if best.map_or(true, |(_, best_year)| year < best_year) {
                best = Some((item, year));
            }
        }
    }

    best.map(|(item, _)| item).or_else(|| items.first())
}

/// First tag of the best candidate, else first tag of any candidate in order
fn genre(best: &Candidate, candidates: &[Candidate]) -> String {
    best.tags
        .first()
        .or_else(|| candidates.iter().find_map(|c| c.tags.first()))
        .map(|tag| tag.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

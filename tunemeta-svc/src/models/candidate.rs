//! Catalog search candidates
//!
//! Read-only inputs to the candidate selector. The catalog client maps its
//! wire format into these types.

/// One catalog search result (a recording)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub duration_ms: Option<i32>,
    /// Ordered by catalog relevance; only the first one is used as genre
    pub tags: Vec<Tag>,
    pub releases: Vec<Release>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

/// A release the recording appears on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Release {
    pub title: Option<String>,
    /// "YYYY", "YYYY-MM" or "YYYY-MM-DD"
    pub date: Option<String>,
}

impl Release {
    pub fn new(title: &str, date: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            date: Some(date.to_string()),
        }
    }
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

//! Hypermedia links and path joining.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// HTTP verb advertised by a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// One hypermedia affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    pub method: HttpVerb,
}

/// Build a link. `rel` is not validated.
pub fn create_link(rel: impl Into<String>, href: impl Into<String>, method: HttpVerb) -> Link {
    Link {
        rel: rel.into(),
        href: href.into(),
        method,
    }
}

/// Join `base` with the given segments.
///
/// Slashes around every segment are trimmed and empty segments are skipped,
/// so the result never contains `//`. The result always starts with `/`.
pub fn api_path(base: &str, segments: &[&dyn Display]) -> String {
    let mut path = String::new();
    let base = base.trim_matches('/');
    if !base.is_empty() {
        path.push('/');
        path.push_str(base);
    }

    for segment in segments {
        let segment = segment.to_string();
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        path.push('/');
        path.push_str(segment);
    }

    if path.is_empty() {
        path.push('/');
    }
    path
}

/// The versioned API root every link is built from (e.g. `/api/v1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
    base: String,
}

impl ApiPaths {
    pub fn new(prefix: &str, version: &str) -> Self {
        Self {
            base: api_path(prefix, &[&version]),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}/{collection}`
    pub fn collection(&self, collection: &str) -> String {
        api_path(&self.base, &[&collection])
    }

    /// `{base}/{collection}/{id}`
    pub fn item(&self, collection: &str, id: impl Display) -> String {
        api_path(&self.base, &[&collection, &id])
    }

    /// `{base}/{segments...}`
    pub fn join(&self, segments: &[&dyn Display]) -> String {
        api_path(&self.base, segments)
    }
}

//! Response envelopes.
//!
//! Envelopes are values: every builder step consumes the previous value and
//! returns a new one, so an entity decorated twice never shares a link set.

use serde::{Deserialize, Serialize};

use super::link::Link;

/// Payload plus the links that describe the next operations on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: T,
    #[serde(rename = "_links", default)]
    pub links: Vec<Link>,
}

impl<T> ResponseEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            links: Vec::new(),
        }
    }

    /// Replace the container links.
    pub fn with_links(self, links: impl IntoIterator<Item = Link>) -> Self {
        Self {
            data: self.data,
            links: links.into_iter().collect(),
        }
    }
}

impl<T> ResponseEnvelope<Vec<T>> {
    /// Second pass of the collection pattern: decorate every element with
    /// its own links. Container links stay on the container.
    pub fn link_items<F>(self, mut item_links: F) -> ResponseEnvelope<Vec<Linked<T>>>
    where
        F: FnMut(&T) -> Vec<Link>,
    {
        let data = self
            .data
            .into_iter()
            .map(|item| {
                let links = item_links(&item);
                Linked::new(item, links)
            })
            .collect();

        ResponseEnvelope {
            data,
            links: self.links,
        }
    }
}

/// A single resource with its own links flattened next to its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub entity: T,
    #[serde(rename = "_links", default)]
    pub links: Vec<Link>,
}

impl<T> Linked<T> {
    pub fn new(entity: T, links: Vec<Link>) -> Self {
        Self { entity, links }
    }
}

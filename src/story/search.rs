//! Story search predicates.

use serde::Deserialize;

use super::model::Story;
use crate::http::request::Validate;
use crate::search::{contains_ci, AndCondition, Matcher};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStoryDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<i64>,
}

/// Every field is optional; an empty body matches everything.
impl Validate for SearchStoryDto {}

#[derive(Debug, Clone, PartialEq)]
pub enum StoryFilter {
    TitleContains(String),
    DescriptionContains(String),
    ContentContains(String),
    AuthorIs(i64),
}

impl Matcher<Story> for StoryFilter {
    fn matches(&self, story: &Story) -> bool {
        match self {
            StoryFilter::TitleContains(text) => contains_ci(&story.title, text),
            StoryFilter::DescriptionContains(text) => story
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, text)),
            StoryFilter::ContentContains(text) => contains_ci(&story.content, text),
            StoryFilter::AuthorIs(id) => story.author_id == *id,
        }
    }
}

pub fn search_condition(dto: &SearchStoryDto) -> AndCondition<StoryFilter> {
    AndCondition::new()
        .and_if(dto.title.clone(), StoryFilter::TitleContains)
        .and_if(dto.description.clone(), StoryFilter::DescriptionContains)
        .and_if(dto.content.clone(), StoryFilter::ContentContains)
        .and_if(dto.author_id, StoryFilter::AuthorIs)
}

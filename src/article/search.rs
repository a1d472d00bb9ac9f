use serde::Deserialize;

use super::model::Article;
use crate::http::request::Validate;
use crate::search::{contains_ci, AndCondition, Matcher};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArticleDto {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<i64>,
}

/// Every field is optional; an empty body matches everything.
impl Validate for SearchArticleDto {}

#[derive(Debug, Clone, PartialEq)]
pub enum ArticleFilter {
    TitleContains(String),
    ContentContains(String),
    AuthorIs(i64),
}

impl Matcher<Article> for ArticleFilter {
    fn matches(&self, article: &Article) -> bool {
        match self {
            ArticleFilter::TitleContains(text) => contains_ci(&article.title, text),
            ArticleFilter::ContentContains(text) => contains_ci(&article.content, text),
            ArticleFilter::AuthorIs(id) => article.author_id == *id,
        }
    }
}

pub fn search_condition(dto: &SearchArticleDto) -> AndCondition<ArticleFilter> {
    AndCondition::new()
        .and_if(dto.title.clone(), ArticleFilter::TitleContains)
        .and_if(dto.content.clone(), ArticleFilter::ContentContains)
        .and_if(dto.author_id, ArticleFilter::AuthorIs)
}

use std::sync::Arc;

use chrono::Utc;

use crate::db::{Database, DbError};
use crate::error::{ApiError, ApiResult};

use super::model::{Article, CreateArticleDto, UpdateArticleDto};
use super::search::{search_condition, SearchArticleDto};

#[derive(Debug, Clone)]
pub struct ArticleService {
    db: Arc<Database>,
}

impl ArticleService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_many(&self, limit: Option<usize>) -> Vec<Article> {
        self.search(&SearchArticleDto::default(), limit)
    }

    pub fn find_one_by_id(&self, id: i64) -> ApiResult<Article> {
        self.db
            .read(|t| t.articles.get(id).cloned())
            .ok_or(ApiError::NotFound)
    }

    pub fn search(&self, dto: &SearchArticleDto, limit: Option<usize>) -> Vec<Article> {
        let condition = search_condition(dto);
        self.db.read(|t| {
            t.articles
                .newest_first()
                .filter(|a| condition.matches(*a))
                .take(limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()
        })
    }

    pub fn create(&self, author_id: i64, dto: CreateArticleDto) -> ApiResult<Article> {
        let article = self.db.transaction(|t| {
            if !t.users.contains(author_id) {
                return Err(DbError::RecordNotFound);
            }
            let now = Utc::now();
            let article = t.articles.insert_with(|id| Article {
                id,
                title: dto.title,
                content: dto.content,
                created_at: now,
                updated_at: now,
                author_id,
            });
            Ok(article.clone())
        })?;

        tracing::info!(article_id = article.id, author_id, "Article created");
        Ok(article)
    }

    pub fn update(&self, id: i64, dto: UpdateArticleDto) -> ApiResult<Article> {
        let article = self.db.transaction(|t| {
            let article = t.articles.get_mut(id)?;
            if let Some(title) = dto.title {
                article.title = title;
            }
            if let Some(content) = dto.content {
                article.content = content;
            }
            article.updated_at = Utc::now();
            Ok(article.clone())
        })?;
        Ok(article)
    }

    pub fn delete(&self, id: i64) -> ApiResult<Article> {
        let article = self.db.transaction(|t| t.articles.remove(id))?;
        tracing::info!(article_id = id, "Article deleted");
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{NewUser, UserService};

    #[test]
    fn test_search_ands_present_fields() {
        let db = Arc::new(Database::new());
        let users = UserService::new(db.clone());
        let mut authors = Vec::new();
        for email in ["a@example.com", "b@example.com"] {
            let user = users
                .create(NewUser {
                    email: email.into(),
                    given_name: None,
                    family_name: None,
                    password_hash: String::new(),
                })
                .unwrap();
            authors.push(user.id);
        }

        let articles = ArticleService::new(db);
        for (author, title) in [(authors[0], "Rust tips"), (authors[1], "Rust news"), (authors[0], "Go tips")] {
            articles
                .create(
                    author,
                    CreateArticleDto {
                        title: title.into(),
                        content: String::new(),
                        author_id: None,
                    },
                )
                .unwrap();
        }

        let hits = articles.search(
            &SearchArticleDto {
                title: Some("rust".into()),
                author_id: Some(authors[0]),
                ..Default::default()
            },
            None,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust tips");
        assert_eq!(articles.search(&SearchArticleDto::default(), None), articles.find_many(None));
    }
}

use std::sync::Arc;

use chrono::Utc;

use crate::db::{Database, DbError};
use crate::error::{ApiError, ApiResult};

use super::model::{CreateStoryDto, Story, UpdateStoryDto};
use super::search::{search_condition, SearchStoryDto};

#[derive(Debug, Clone)]
pub struct StoryService {
    db: Arc<Database>,
}

impl StoryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Newest stories first, joined with their author's name.
    pub fn find_many(&self, limit: Option<usize>) -> Vec<Story> {
        self.search(&SearchStoryDto::default(), limit)
    }

    pub fn find_one_by_id(&self, id: i64) -> ApiResult<Story> {
        self.db
            .read(|t| t.stories.get(id).map(|s| t.story_with_author(s)))
            .ok_or(ApiError::NotFound)
    }

    pub fn find_many_by_author(&self, author_id: i64, limit: Option<usize>) -> Vec<Story> {
        let dto = SearchStoryDto {
            author_id: Some(author_id),
            ..Default::default()
        };
        self.search(&dto, limit)
    }

    pub fn find_one_by_author(&self, id: i64, author_id: i64) -> ApiResult<Story> {
        self.find_one_by_id(id)
            .ok()
            .filter(|s| s.author_id == author_id)
            .ok_or(ApiError::NotFound)
    }

    pub fn search(&self, dto: &SearchStoryDto, limit: Option<usize>) -> Vec<Story> {
        let condition = search_condition(dto);
        self.db.read(|t| {
            t.stories
                .newest_first()
                .filter(|s| condition.matches(*s))
                .take(limit.unwrap_or(usize::MAX))
                .map(|s| t.story_with_author(s))
                .collect()
        })
    }

    pub fn create(&self, author_id: i64, dto: CreateStoryDto) -> ApiResult<Story> {
        let story = self.db.transaction(|t| {
            if !t.users.contains(author_id) {
                return Err(DbError::RecordNotFound);
            }
            let now = Utc::now();
            let story = t.stories.insert_with(|id| Story {
                id,
                title: dto.title,
                description: dto.description,
                content: dto.content,
                created_at: now,
                updated_at: now,
                author_id,
                author: None,
            });
            Ok(story.clone())
        })?;

        tracing::info!(story_id = story.id, author_id, "Story created");
        Ok(story)
    }

    pub fn update(&self, id: i64, dto: UpdateStoryDto) -> ApiResult<Story> {
        let story = self.db.transaction(|t| {
            let story = t.stories.get_mut(id)?;
            if let Some(title) = dto.title {
                story.title = title;
            }
            if let Some(description) = dto.description {
                story.description = Some(description);
            }
            if let Some(content) = dto.content {
                story.content = content;
            }
            story.updated_at = Utc::now();
            Ok(story.clone())
        })?;
        Ok(story)
    }

    /// Detach the story from every reading list, then delete it. Both writes
    /// commit together.
    pub fn delete(&self, id: i64) -> ApiResult<Story> {
        let (story, detached) = self.db.transaction(|t| {
            let detached = t.detach_story(id);
            let story = t.stories.remove(id)?;
            Ok((story, detached))
        })?;

        tracing::info!(story_id = id, detached, "Story deleted");
        Ok(story)
    }
}

use std::sync::Arc;

use chrono::Utc;

use crate::db::{Database, DbError, Tables};
use crate::error::{ApiError, ApiResult};

use super::model::{CreateReadingListDto, ReadingList};

#[derive(Debug, Clone)]
pub struct ReadingListService {
    db: Arc<Database>,
}

fn find_id(t: &Tables, author_id: i64, title: &str) -> Option<i64> {
    t.reading_lists
        .newest_first()
        .find(|l| l.author_id == author_id && l.title == title)
        .map(|l| l.id)
}

fn resolve(t: &Tables, list: &ReadingList) -> ReadingList {
    ReadingList {
        stories: t.stories_of_list(list.id),
        ..list.clone()
    }
}

impl ReadingListService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_many_by_author(&self, author_id: i64, limit: Option<usize>) -> Vec<ReadingList> {
        self.db.read(|t| {
            t.reading_lists
                .newest_first()
                .filter(|l| l.author_id == author_id)
                .take(limit.unwrap_or(usize::MAX))
                .map(|l| resolve(t, l))
                .collect()
        })
    }

    pub fn find_unique(&self, author_id: i64, title: &str) -> ApiResult<ReadingList> {
        self.db
            .read(|t| {
                find_id(t, author_id, title)
                    .and_then(|id| t.reading_lists.get(id))
                    .map(|l| resolve(t, l))
            })
            .ok_or(ApiError::NotFound)
    }

    pub fn create(&self, author_id: i64, dto: CreateReadingListDto) -> ApiResult<ReadingList> {
        let list = self.db.transaction(|t| {
            if !t.users.contains(author_id) {
                return Err(DbError::RecordNotFound);
            }
            if find_id(t, author_id, &dto.title).is_some() {
                return Err(DbError::UniqueViolation("reading list title"));
            }
            let list = t.reading_lists.insert_with(|id| ReadingList {
                id,
                title: dto.title,
                author_id,
                created_at: Utc::now(),
                stories: Vec::new(),
            });
            Ok(list.clone())
        })?;

        tracing::info!(reading_list_id = list.id, author_id, "Reading list created");
        Ok(list)
    }

    pub fn delete(&self, author_id: i64, title: &str) -> ApiResult<ReadingList> {
        let list = self.db.transaction(|t| {
            let id = find_id(t, author_id, title).ok_or(DbError::RecordNotFound)?;
            t.reading_list_stories.retain(|&(list_id, _)| list_id != id);
            t.reading_lists.remove(id)
        })?;
        Ok(list)
    }

    /// Attach a story. Attaching twice is a no-op.
    pub fn add_story(&self, author_id: i64, title: &str, story_id: i64) -> ApiResult<ReadingList> {
        let list = self.db.transaction(|t| {
            let id = find_id(t, author_id, title).ok_or(DbError::RecordNotFound)?;
            if !t.stories.contains(story_id) {
                return Err(DbError::RecordNotFound);
            }
            t.reading_list_stories.insert((id, story_id));
            let list = t.reading_lists.get(id).ok_or(DbError::RecordNotFound)?;
            Ok(resolve(t, list))
        })?;
        Ok(list)
    }

    pub fn remove_story(&self, author_id: i64, title: &str, story_id: i64) -> ApiResult<ReadingList> {
        let list = self.db.transaction(|t| {
            let id = find_id(t, author_id, title).ok_or(DbError::RecordNotFound)?;
            if !t.reading_list_stories.remove(&(id, story_id)) {
                return Err(DbError::RecordNotFound);
            }
            let list = t.reading_lists.get(id).ok_or(DbError::RecordNotFound)?;
            Ok(resolve(t, list))
        })?;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::{CreateStoryDto, StoryService};
    use crate::user::{NewUser, UserService};

    fn setup() -> (ReadingListService, StoryService, i64) {
        let db = Arc::new(Database::new());
        let user = UserService::new(db.clone())
            .create(NewUser {
                email: "ada@example.com".into(),
                given_name: None,
                family_name: None,
                password_hash: String::new(),
            })
            .unwrap();
        (ReadingListService::new(db.clone()), StoryService::new(db), user.id)
    }

    fn list(title: &str) -> CreateReadingListDto {
        CreateReadingListDto { title: title.into() }
    }

    #[test]
    fn test_title_is_unique_per_author() {
        let (lists, _, author) = setup();
        lists.create(author, list("later")).unwrap();
        assert_eq!(
            lists.create(author, list("later")).unwrap_err(),
            ApiError::Conflict("reading list title already exists".into())
        );
    }

    #[test]
    fn test_add_and_remove_story() {
        let (lists, stories, author) = setup();
        let story = stories
            .create(
                author,
                CreateStoryDto {
                    title: "one".into(),
                    description: None,
                    content: String::new(),
                    author_id: None,
                },
            )
            .unwrap();
        lists.create(author, list("later")).unwrap();

        let with_story = lists.add_story(author, "later", story.id).unwrap();
        assert_eq!(with_story.stories.len(), 1);
        let again = lists.add_story(author, "later", story.id).unwrap();
        assert_eq!(again.stories.len(), 1);

        let without = lists.remove_story(author, "later", story.id).unwrap();
        assert!(without.stories.is_empty());
        assert_eq!(
            lists.remove_story(author, "later", story.id).unwrap_err(),
            ApiError::NotFound
        );
    }

    #[test]
    fn test_add_unknown_story_is_not_found() {
        let (lists, _, author) = setup();
        lists.create(author, list("later")).unwrap();
        assert_eq!(lists.add_story(author, "later", 77).unwrap_err(), ApiError::NotFound);
    }

    #[test]
    fn test_delete_removes_list() {
        let (lists, _, author) = setup();
        lists.create(author, list("later")).unwrap();
        lists.delete(author, "later").unwrap();
        assert_eq!(lists.find_unique(author, "later").unwrap_err(), ApiError::NotFound);
        assert!(lists.find_many_by_author(author, None).is_empty());
    }
}

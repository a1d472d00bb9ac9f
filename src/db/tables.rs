//! Table storage and cross-table helpers.

use std::collections::{BTreeMap, BTreeSet};

use super::DbError;
use crate::article::Article;
use crate::reading_list::ReadingList;
use crate::story::Story;
use crate::subscription::Subscription;
use crate::user::{AuthorName, User};

/// Rows keyed by id. Ids start at 1 and are never reused.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<R> Table<R> {
    /// Insert the row built for the next id.
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> R) -> &R {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(build(id))
    }

    pub fn get(&self, id: i64) -> Option<&R> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Result<&mut R, DbError> {
        self.rows.get_mut(&id).ok_or(DbError::RecordNotFound)
    }

    pub fn remove(&mut self, id: i64) -> Result<R, DbError> {
        self.rows.remove(&id).ok_or(DbError::RecordNotFound)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Rows ordered by id, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &R> {
        self.rows.values().rev()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Table<User>,
    pub stories: Table<Story>,
    pub articles: Table<Article>,
    pub reading_lists: Table<ReadingList>,
    /// `(reading_list_id, story_id)` associations.
    pub reading_list_stories: BTreeSet<(i64, i64)>,
    pub subscriptions: Table<Subscription>,
}

impl Tables {
    pub fn author_name(&self, user_id: i64) -> Option<AuthorName> {
        self.users.get(user_id).map(AuthorName::from)
    }

    /// A story row joined with its author's name.
    pub fn story_with_author(&self, story: &Story) -> Story {
        Story {
            author: self.author_name(story.author_id),
            ..story.clone()
        }
    }

    /// Stories attached to a reading list, newest first.
    pub fn stories_of_list(&self, reading_list_id: i64) -> Vec<Story> {
        self.reading_list_stories
            .range((reading_list_id, i64::MIN)..=(reading_list_id, i64::MAX))
            .rev()
            .filter_map(|&(_, story_id)| self.stories.get(story_id))
            .map(|story| self.story_with_author(story))
            .collect()
    }

    /// Detach a story from every reading list. Returns the number of removed rows.
    pub fn detach_story(&mut self, story_id: i64) -> usize {
        let before = self.reading_list_stories.len();
        self.reading_list_stories.retain(|&(_, s)| s != story_id);
        before - self.reading_list_stories.len()
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .newest_first()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }
}

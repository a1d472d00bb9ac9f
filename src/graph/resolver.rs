//! Field resolvers for the user node.

use serde::{Deserialize, Serialize};

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::reading_list::{ReadingList, ReadingListService};
use crate::story::{Story, StoryService};
use crate::user::{User, UserService};

/// Which fields of the node to resolve, taken from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSelection {
    pub stories_limit: Option<usize>,
    pub story: Option<i64>,
    #[serde(default)]
    pub reading_lists: bool,
    pub reading_lists_limit: Option<usize>,
    pub reading_list: Option<String>,
}

impl UserSelection {
    fn wants_reading_lists(&self) -> bool {
        self.reading_lists || self.reading_lists_limit.is_some()
    }
}

/// A resolved user with its selected relations. Raw shapes, no links.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    #[serde(flatten)]
    pub user: User,
    pub stories: Vec<Story>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<Story>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_lists: Option<Vec<ReadingList>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_list: Option<ReadingList>,
}

#[derive(Debug, Clone)]
pub struct UserResolver {
    users: UserService,
    stories: StoryService,
    reading_lists: ReadingListService,
}

impl UserResolver {
    pub fn new(users: UserService, stories: StoryService, reading_lists: ReadingListService) -> Self {
        Self {
            users,
            stories,
            reading_lists,
        }
    }

    pub fn user(&self, id: i64) -> ApiResult<User> {
        self.users.find_one_by_id(id)
    }

    pub fn stories(&self, user: &User, limit: Option<usize>) -> Vec<Story> {
        self.stories.find_many_by_author(user.id, limit)
    }

    /// `None` when the story does not exist or belongs to someone else.
    pub fn story(&self, user: &User, story_id: i64) -> Option<Story> {
        self.stories.find_one_by_author(story_id, user.id).ok()
    }

    /// Guarded: requires an authenticated caller.
    pub fn reading_lists(
        &self,
        caller: Option<&Principal>,
        user: &User,
        limit: Option<usize>,
    ) -> ApiResult<Vec<ReadingList>> {
        if caller.is_none() {
            return Err(ApiError::Unauthorized);
        }
        Ok(self.reading_lists.find_many_by_author(user.id, limit))
    }

    pub fn reading_list(&self, user: &User, title: &str) -> Option<ReadingList> {
        self.reading_lists.find_unique(user.id, title).ok()
    }

    /// Resolve the node and every selected field.
    pub fn resolve(&self, id: i64, selection: &UserSelection, caller: Option<&Principal>) -> ApiResult<UserNode> {
        let user = self.user(id)?;

        let reading_lists = if selection.wants_reading_lists() {
            Some(self.reading_lists(caller, &user, selection.reading_lists_limit)?)
        } else {
            None
        };

        Ok(UserNode {
            stories: self.stories(&user, selection.stories_limit),
            story: selection.story.and_then(|story_id| self.story(&user, story_id)),
            reading_list: selection
                .reading_list
                .as_deref()
                .and_then(|title| self.reading_list(&user, title)),
            reading_lists,
            user,
        })
    }
}

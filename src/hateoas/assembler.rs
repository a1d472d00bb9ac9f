//! Link sets per resource.
//!
//! Pure functions: each returns the links for one resource or container and
//! never touches the payload.

use crate::article::{Article, ARTICLE_PATH};
use crate::auth::AUTH_PATH;
use crate::reading_list::{ReadingList, READING_LIST_PATH};
use crate::story::{Story, STORY_PATH};
use crate::subscription::{Subscription, SUBSCRIPTION_PATH};
use crate::user::{User, USER_PATH};

use super::link::{create_link, ApiPaths, HttpVerb, Link};

/// `update` and `delete` on `href`, only when the caller owns the resource.
pub fn owner_links(caller: Option<i64>, owner_id: i64, href: &str) -> Vec<Link> {
    if caller != Some(owner_id) {
        return Vec::new();
    }
    vec![
        create_link("update", href, HttpVerb::Patch),
        create_link("delete", href, HttpVerb::Delete),
    ]
}

pub fn root_links(paths: &ApiPaths) -> Vec<Link> {
    vec![
        create_link("self", paths.base(), HttpVerb::Get),
        create_link("stories", paths.collection(STORY_PATH), HttpVerb::Get),
        create_link("articles", paths.collection(ARTICLE_PATH), HttpVerb::Get),
        create_link("signUp", paths.join(&[&AUTH_PATH, &"sign-up"]), HttpVerb::Post),
        create_link("signIn", paths.join(&[&AUTH_PATH, &"sign-in"]), HttpVerb::Post),
    ]
}

// stories

pub fn story_collection_links(paths: &ApiPaths) -> Vec<Link> {
    vec![
        create_link("self", paths.collection(STORY_PATH), HttpVerb::Get),
        create_link("search", paths.join(&[&STORY_PATH, &"search"]), HttpVerb::Post),
    ]
}

pub fn story_search_links(paths: &ApiPaths) -> Vec<Link> {
    vec![create_link("self", paths.join(&[&STORY_PATH, &"search"]), HttpVerb::Post)]
}

/// Links of a story inside a collection.
pub fn story_item_links(paths: &ApiPaths, story: &Story) -> Vec<Link> {
    vec![
        create_link("self", paths.item(STORY_PATH, story.id), HttpVerb::Get),
        create_link("author", paths.item(USER_PATH, story.author_id), HttpVerb::Get),
    ]
}

/// Links of a single story as seen by `caller`.
pub fn story_links(paths: &ApiPaths, story: &Story, caller: Option<i64>) -> Vec<Link> {
    let mut links = story_item_links(paths, story);
    links.extend(owner_links(caller, story.author_id, &paths.item(STORY_PATH, story.id)));
    links
}

// articles

pub fn article_collection_links(paths: &ApiPaths) -> Vec<Link> {
    vec![
        create_link("self", paths.collection(ARTICLE_PATH), HttpVerb::Get),
        create_link("search", paths.join(&[&ARTICLE_PATH, &"search"]), HttpVerb::Post),
    ]
}

pub fn article_search_links(paths: &ApiPaths) -> Vec<Link> {
    vec![create_link("self", paths.join(&[&ARTICLE_PATH, &"search"]), HttpVerb::Post)]
}

pub fn article_item_links(paths: &ApiPaths, article: &Article) -> Vec<Link> {
    vec![
        create_link("self", paths.item(ARTICLE_PATH, article.id), HttpVerb::Get),
        create_link("author", paths.item(USER_PATH, article.author_id), HttpVerb::Get),
    ]
}

pub fn article_links(paths: &ApiPaths, article: &Article, caller: Option<i64>) -> Vec<Link> {
    let mut links = article_item_links(paths, article);
    links.extend(owner_links(caller, article.author_id, &paths.item(ARTICLE_PATH, article.id)));
    links
}

// users

pub fn user_stories_href(paths: &ApiPaths, user_id: i64) -> String {
    paths.join(&[&USER_PATH, &user_id, &STORY_PATH])
}

pub fn user_links(paths: &ApiPaths, user: &User, caller: Option<i64>) -> Vec<Link> {
    let mut links = vec![
        create_link("self", paths.item(USER_PATH, user.id), HttpVerb::Get),
        create_link("stories", user_stories_href(paths, user.id), HttpVerb::Get),
    ];
    if caller == Some(user.id) {
        links.push(create_link("readingLists", reading_lists_href(paths, user.id), HttpVerb::Get));
        links.push(create_link("update", paths.item(USER_PATH, user.id), HttpVerb::Patch));
    }
    links
}

pub fn user_stories_links(paths: &ApiPaths, user_id: i64) -> Vec<Link> {
    vec![create_link("self", user_stories_href(paths, user_id), HttpVerb::Get)]
}

// reading lists

pub fn reading_lists_href(paths: &ApiPaths, user_id: i64) -> String {
    paths.join(&[&USER_PATH, &user_id, &READING_LIST_PATH])
}

pub fn reading_list_href(paths: &ApiPaths, list: &ReadingList) -> String {
    let title = urlencoding::encode(&list.title);
    paths.join(&[&USER_PATH, &list.author_id, &READING_LIST_PATH, &title])
}

pub fn reading_list_collection_links(paths: &ApiPaths, user_id: i64) -> Vec<Link> {
    vec![create_link("self", reading_lists_href(paths, user_id), HttpVerb::Get)]
}

pub fn reading_list_item_links(paths: &ApiPaths, list: &ReadingList) -> Vec<Link> {
    vec![
        create_link("self", reading_list_href(paths, list), HttpVerb::Get),
        create_link("author", paths.item(USER_PATH, list.author_id), HttpVerb::Get),
    ]
}

/// Reading lists are only ever shown to their author.
pub fn reading_list_links(paths: &ApiPaths, list: &ReadingList) -> Vec<Link> {
    let mut links = reading_list_item_links(paths, list);
    links.push(create_link("delete", reading_list_href(paths, list), HttpVerb::Delete));
    links.push(create_link(
        "addStory",
        format!("{}/{}/{{storyId}}", reading_list_href(paths, list), STORY_PATH),
        HttpVerb::Put,
    ));
    links
}

// subscriptions

pub fn subscription_links(paths: &ApiPaths, subscription: &Subscription, caller: Option<i64>) -> Vec<Link> {
    let href = paths.item(SUBSCRIPTION_PATH, subscription.id);
    let mut links = vec![
        create_link("self", href.clone(), HttpVerb::Get),
        create_link("author", paths.item(USER_PATH, subscription.author_id), HttpVerb::Get),
        create_link("subscriber", paths.item(USER_PATH, subscription.subscriber_id), HttpVerb::Get),
    ];
    if caller == Some(subscription.subscriber_id) {
        links.push(create_link("delete", href, HttpVerb::Delete));
    }
    links
}

// auth

pub fn token_links(paths: &ApiPaths, user: &User) -> Vec<Link> {
    vec![create_link("user", paths.item(USER_PATH, user.id), HttpVerb::Get)]
}

//! Adaptive search timeline decoding
//!
//! The response keeps entities in `globalObjects` keyed by ID and their
//! display order in `timeline.instructions`. Items are emitted in entry
//! order; the `Bottom` cursor entry continues the search.

use super::types::{Profile, Tweet};
use crate::pagination::Page;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

const BOTTOM_CURSOR: &str = "Bottom";
const SITE_URL: &str = "https://twitter.com";

/// Raw adaptive search response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Timeline {
    #[serde(default)]
    global_objects: GlobalObjects,
    #[serde(default)]
    timeline: Instructions,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalObjects {
    #[serde(default)]
    tweets: HashMap<String, LegacyTweet>,
    #[serde(default)]
    users: HashMap<String, LegacyUser>,
}

#[derive(Debug, Default, Deserialize)]
struct Instructions {
    #[serde(default)]
    instructions: Vec<Instruction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Instruction {
    add_entries: Option<AddEntries>,
    replace_entry: Option<ReplaceEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct AddEntries {
    #[serde(default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplaceEntry {
    #[serde(default)]
    entry: Entry,
}

#[derive(Debug, Default, Deserialize)]
struct Entry {
    #[serde(default)]
    content: EntryContent,
}

#[derive(Debug, Default, Deserialize)]
struct EntryContent {
    item: Option<Item>,
    operation: Option<Operation>,
}

#[derive(Debug, Default, Deserialize)]
struct Item {
    #[serde(default)]
    content: ItemContent,
}

#[derive(Debug, Default, Deserialize)]
struct ItemContent {
    tweet: Option<IdRef>,
    user: Option<IdRef>,
}

#[derive(Debug, Default, Deserialize)]
struct IdRef {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct Operation {
    cursor: Option<Cursor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Cursor {
    #[serde(default)]
    value: String,
    #[serde(default)]
    cursor_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyTweet {
    id_str: String,
    conversation_id_str: Option<String>,
    full_text: String,
    user_id_str: String,
    created_at: String,
    favorite_count: u64,
    retweet_count: u64,
    reply_count: u64,
    quote_count: u64,
    in_reply_to_status_id_str: Option<String>,
    entities: TweetEntities,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TweetEntities {
    hashtags: Vec<Hashtag>,
    urls: Vec<UrlEntity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Hashtag {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UrlEntity {
    expanded_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyUser {
    id_str: String,
    screen_name: String,
    name: String,
    description: String,
    location: String,
    followers_count: u64,
    friends_count: u64,
    statuses_count: u64,
    favourites_count: u64,
    verified: bool,
    protected: bool,
    created_at: String,
}

impl Timeline {
    /// Posts in display order plus the next cursor
    pub(crate) fn into_tweets(self) -> Page<Tweet> {
        let mut tweets = Vec::new();
        for entry in self.entries() {
            let Some(id) = entry_id(entry, |c| c.tweet.as_ref()) else {
                continue;
            };
            if let Some(legacy) = self.global_objects.tweets.get(id) {
                let author = self.global_objects.users.get(&legacy.user_id_str);
                tweets.push(to_tweet(legacy, author));
            }
        }
        Page::new(tweets, self.bottom_cursor())
    }

    /// Profiles in display order plus the next cursor
    pub(crate) fn into_profiles(self) -> Page<Profile> {
        let mut profiles = Vec::new();
        for entry in self.entries() {
            let Some(id) = entry_id(entry, |c| c.user.as_ref()) else {
                continue;
            };
            if let Some(legacy) = self.global_objects.users.get(id) {
                profiles.push(to_profile(legacy));
            }
        }
        Page::new(profiles, self.bottom_cursor())
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.timeline
            .instructions
            .iter()
            .filter_map(|i| i.add_entries.as_ref())
            .flat_map(|add| add.entries.iter())
    }

    /// Last `Bottom` cursor from added or replaced entries
    fn bottom_cursor(&self) -> String {
        let mut cursor = String::new();
        for instruction in &self.timeline.instructions {
            let added = instruction
                .add_entries
                .iter()
                .flat_map(|add| add.entries.iter());
            let replaced = instruction.replace_entry.iter().map(|r| &r.entry);

            for entry in added.chain(replaced) {
                if let Some(c) = entry
                    .content
                    .operation
                    .as_ref()
                    .and_then(|op| op.cursor.as_ref())
                {
                    if c.cursor_type == BOTTOM_CURSOR {
                        cursor.clone_from(&c.value);
                    }
                }
            }
        }
        cursor
    }
}

fn entry_id(entry: &Entry, pick: impl Fn(&ItemContent) -> Option<&IdRef>) -> Option<&str> {
    let item = entry.content.item.as_ref()?;
    pick(&item.content)
        .map(|r| r.id.as_str())
        .filter(|id| !id.is_empty())
}

fn to_tweet(legacy: &LegacyTweet, author: Option<&LegacyUser>) -> Tweet {
    let (username, name) = author
        .map(|u| (u.screen_name.clone(), u.name.clone()))
        .unwrap_or_default();

    Tweet {
        id: legacy.id_str.clone(),
        conversation_id: legacy.conversation_id_str.clone(),
        text: legacy.full_text.clone(),
        user_id: legacy.user_id_str.clone(),
        permanent_url: format!("{SITE_URL}/{username}/status/{}", legacy.id_str),
        username,
        name,
        timestamp: parse_created_at(&legacy.created_at),
        likes: legacy.favorite_count,
        retweets: legacy.retweet_count,
        replies: legacy.reply_count,
        quotes: legacy.quote_count,
        hashtags: legacy
            .entities
            .hashtags
            .iter()
            .map(|h| h.text.clone())
            .collect(),
        urls: legacy
            .entities
            .urls
            .iter()
            .map(|u| u.expanded_url.clone())
            .collect(),
        is_reply: legacy
            .in_reply_to_status_id_str
            .as_deref()
            .is_some_and(|id| !id.is_empty()),
    }
}

fn to_profile(legacy: &LegacyUser) -> Profile {
    Profile {
        user_id: legacy.id_str.clone(),
        username: legacy.screen_name.clone(),
        name: legacy.name.clone(),
        biography: legacy.description.clone(),
        location: legacy.location.clone(),
        followers_count: legacy.followers_count,
        following_count: legacy.friends_count,
        tweets_count: legacy.statuses_count,
        likes_count: legacy.favourites_count,
        is_verified: legacy.verified,
        is_private: legacy.protected,
        joined: parse_created_at(&legacy.created_at),
        url: format!("{SITE_URL}/{}", legacy.screen_name),
    }
}

/// Parse timestamps like `Wed Oct 10 20:19:24 +0000 2018`
fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, "%a %b %d %H:%M:%S %z %Y")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

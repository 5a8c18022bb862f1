//! Search result entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post returned by search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    /// Post ID
    pub id: String,
    /// ID of the conversation root
    pub conversation_id: Option<String>,
    /// Full text
    pub text: String,
    /// Author ID
    pub user_id: String,
    /// Author handle
    pub username: String,
    /// Author display name
    pub name: String,
    /// Creation time
    pub timestamp: Option<DateTime<Utc>>,
    /// Like count
    pub likes: u64,
    /// Repost count
    pub retweets: u64,
    /// Reply count
    pub replies: u64,
    /// Quote count
    pub quotes: u64,
    /// Hashtags without the leading `#`
    pub hashtags: Vec<String>,
    /// Expanded link URLs
    pub urls: Vec<String>,
    /// Whether this post replies to another one
    pub is_reply: bool,
    /// Link to the post
    pub permanent_url: String,
}

/// A user profile returned by search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User ID
    pub user_id: String,
    /// Handle
    pub username: String,
    /// Display name
    pub name: String,
    /// Bio text
    pub biography: String,
    /// Free-form location
    pub location: String,
    /// Follower count
    pub followers_count: u64,
    /// Following count
    pub following_count: u64,
    /// Post count
    pub tweets_count: u64,
    /// Like count
    pub likes_count: u64,
    /// Verified badge
    pub is_verified: bool,
    /// Protected account
    pub is_private: bool,
    /// Account creation time
    pub joined: Option<DateTime<Utc>>,
    /// Link to the profile
    pub url: String,
}

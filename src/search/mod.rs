//! Search endpoint module
//!
//! Query parameters for the adaptive search endpoint and decoding of its
//! timeline responses into [`Tweet`] and [`Profile`] pages.

mod timeline;
mod types;

pub(crate) use timeline::Timeline;
pub use types::{Profile, Tweet};

use serde::{Deserialize, Serialize};

/// Largest page the search endpoint serves
pub const MAX_SEARCH_PAGE_SIZE: usize = 50;

/// Which results a search returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Most relevant posts
    #[default]
    Top,
    /// Most recent posts
    Latest,
    /// Posts with images
    Photos,
    /// Posts with videos
    Videos,
    /// User profiles
    Users,
}

/// Query parameters for one search page
///
/// `count` is capped at [`MAX_SEARCH_PAGE_SIZE`]; the cursor is only sent
/// when non-empty.
pub fn search_params(
    query: &str,
    count: usize,
    cursor: &str,
    mode: SearchMode,
    include_replies: bool,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.to_string()),
        ("count", count.min(MAX_SEARCH_PAGE_SIZE).to_string()),
        ("query_source", "typed_query".to_string()),
        ("requestContext", "launch".to_string()),
        ("spelling_corrections", "1".to_string()),
        ("tweet_mode", "extended".to_string()),
        ("include_ext_edit_control", "true".to_string()),
        ("include_tweet_replies", include_replies.to_string()),
    ];

    if !cursor.is_empty() {
        params.push(("cursor", cursor.to_string()));
    }

    let pc = if mode == SearchMode::Latest { "0" } else { "1" };
    params.push(("pc", pc.to_string()));

    match mode {
        SearchMode::Top => {}
        SearchMode::Latest => params.push(("tweet_search_mode", "live".to_string())),
        SearchMode::Photos => params.push(("result_filter", "image".to_string())),
        SearchMode::Videos => params.push(("result_filter", "video".to_string())),
        SearchMode::Users => params.push(("result_filter", "user".to_string())),
    }

    params
}

//! Simulated network layer.
//!
//! Both fetchers settle after a delay proportional to the requested id, so the
//! post and comments regions of the screen become ready at different times for
//! different selections. There is no real I/O here and no cancellation - a
//! fetch that nobody is waiting for anymore still runs to completion.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Ids above this are rejected by [`fetch_post`].
pub const MAX_POST_ID: u32 = 5;

const DELAY_PER_ID: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid post ID")]
    InvalidPostId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: u32,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: u32,
    pub content: String,
}

/// Fetch a post by id. Fails for ids above [`MAX_POST_ID`], after the same
/// delay a successful fetch would have taken.
pub async fn fetch_post(id: u32) -> Result<Post, FetchError> {
    debug!(id, "fetching post");
    tokio::time::sleep(DELAY_PER_ID * id).await;

    if id > MAX_POST_ID {
        debug!(id, "post fetch rejected");
        return Err(FetchError::InvalidPostId);
    }

    debug!(id, "post fetch settled");
    Ok(Post {
        id,
        title: format!("Post {id}"),
        content: format!("This is the content of post {id}"),
    })
}

/// Fetch the comments for a post. Always succeeds with exactly five comments.
///
/// Typed fallible anyway so both fetchers go through the same resource
/// constructor.
pub async fn fetch_comments(post_id: u32) -> Result<Vec<Comment>, FetchError> {
    debug!(post_id, "fetching comments");
    tokio::time::sleep(DELAY_PER_ID * post_id).await;

    debug!(post_id, "comments fetch settled");
    Ok((0..5)
        .map(|i| Comment {
            id: i,
            content: format!("Comment {i} on post {post_id}"),
        })
        .collect())
}

//! The posts screen: selection state, two independently-suspending regions,
//! and one error boundary around both.

use crate::fetch::{self, Comment, Post};
use std::fmt::Write;
use std::ops::RangeInclusive;
use std::rc::Rc;
use suspense_core::prelude::*;

/// The ids offered by the selector. The last one is rejected by the post
/// fetcher, which is how the error path gets exercised.
pub const POST_IDS: RangeInclusive<u32> = 1..=6;

/// One screen's worth of state: the selected id, a fresh resource pair per
/// selection, and the boundaries that orchestrate rendering.
///
/// Selecting an id never mutates an existing resource back to loading; it
/// constructs two brand-new resources and drops the handles to the old pair.
/// The superseded fetches keep running on the runtime, but nothing reads their
/// resources anymore, so their settlement has no visible effect.
pub struct PostScreen {
    runtime: Rc<Runtime>,
    selected: u32,
    post: Resource<Post>,
    comments: Resource<Vec<Comment>>,
    post_region: SuspenseBoundary,
    comments_region: SuspenseBoundary,
    errors: ErrorBoundary,
}

impl PostScreen {
    /// Build the screen with post 1 selected and both fetches in flight.
    /// Panics outside of a [`RuntimeGuard`].
    pub fn new(runtime: Rc<Runtime>) -> Self {
        let selected = *POST_IDS.start();
        Self {
            post: Resource::new(fetch::fetch_post(selected)),
            comments: Resource::new(fetch::fetch_comments(selected)),
            post_region: SuspenseBoundary::new("Loading post..."),
            comments_region: SuspenseBoundary::new("Loading comments..."),
            errors: ErrorBoundary::new(),
            selected,
            runtime,
        }
    }

    pub fn selected(&self) -> u32 {
        self.selected
    }

    /// Select a post, replacing both resources with fresh ones. Selecting the
    /// currently shown id re-fetches it.
    pub fn select(&mut self, id: u32) {
        tracing::debug!(id, "post selected");
        self.selected = id;
        self.post = Resource::new(fetch::fetch_post(id));
        self.comments = Resource::new(fetch::fetch_comments(id));
    }

    /// Render the whole screen to a text frame.
    pub fn render(&self) -> String {
        let mut frame = String::from("Posts\n");
        for id in POST_IDS {
            _ = writeln!(frame, "[{id}] View Post {id}");
        }

        let body = self.errors.render(|| {
            let post = self.post_region.render(|| post_view(&self.post))?;
            let comments = self
                .comments_region
                .render(|| comments_view(&self.comments))?;
            Ok(format!("{post}\n{comments}"))
        });

        match body {
            Ok(text) => frame.push_str(&text),
            // Both regions suspend inside their own boundaries, so a
            // suspension cannot escape this far
            Err(err) => tracing::warn!(%err, "render signal escaped the screen"),
        }

        frame
    }

    /// Drive the runtime until the current resource pair has settled.
    ///
    /// A selection made while this is pending is not picked up; callers await
    /// it again after selecting.
    pub async fn wait_for_settle(&self) {
        let post = self.post.settled();
        let comments = self.comments.settled();
        self.runtime
            .drive(async move {
                post.await;
                comments.await;
            })
            .await;
    }
}

fn post_view(resource: &Resource<Post>) -> Result<String, RenderError> {
    let post = resource.read()?;
    Ok(format!("{}\n{}", post.title, post.content))
}

fn comments_view(resource: &Resource<Vec<Comment>>) -> Result<String, RenderError> {
    let comments = resource.read()?;
    let mut out = String::from("Comments");
    for comment in &comments {
        out.push('\n');
        out.push_str(&comment.content);
    }
    Ok(out)
}

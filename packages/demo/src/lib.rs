//! A posts/comments screen built on [`suspense_core`].
//!
//! Two independent resources per selection - the post itself and its comments
//! - each behind its own suspense boundary, with one error boundary around
//! both. The fetchers simulate network latency proportional to the selected
//! id, and id 6 exists purely to demonstrate the error path.

pub mod fetch;
pub mod screen;

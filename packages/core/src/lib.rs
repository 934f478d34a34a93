//! A single-threaded suspending-resource runtime.
//!
//! The pattern: a view reads an asynchronous value through a [`Resource`].
//! If the value has not settled yet the read returns
//! [`RenderError::Suspended`] with a stable suspension token instead of
//! blocking; a [`SuspenseBoundary`] catches the token, renders a fallback, and
//! schedules exactly one re-render attempt for when the token settles. A read
//! of a failed resource raises [`RenderError::Aborted`], which an enclosing
//! [`ErrorBoundary`] captures into an error display. The two signals share the
//! `Result` channel but never each other's handlers.
//!
//! Everything runs cooperatively on one thread: futures spawned through the
//! [`Runtime`](runtime::Runtime) interleave with rendering, and the owner of
//! the runtime pumps it with
//! [`wait_for_work`](runtime::Runtime::wait_for_work) or
//! [`drive`](runtime::Runtime::drive).
//!
//! ```no_run
//! use suspense_core::prelude::*;
//!
//! # async fn fetch_greeting() -> Result<String, std::io::Error> { Ok("hi".into()) }
//! # async fn demo() {
//! let runtime = Runtime::new();
//! let _guard = RuntimeGuard::new(runtime.clone());
//!
//! let greeting = Resource::new(fetch_greeting());
//! let boundary = SuspenseBoundary::new("Loading...");
//!
//! // First attempt renders the fallback; the boundary is re-rendered
//! // once the fetch settles.
//! let frame = boundary.render(|| greeting.read());
//! # }
//! ```

pub mod error_boundary;
pub mod render_error;
pub mod resource;
pub mod runtime;
mod settle;
pub mod suspense;
pub mod tasks;

pub use error_boundary::ErrorBoundary;
pub use render_error::{CapturedError, RenderError, SuspendedTask};
pub use resource::{Resource, ResourceState};
pub use runtime::{spawn, BoundaryId, Runtime, RuntimeGuard};
pub use settle::SettleFuture;
pub use suspense::SuspenseBoundary;
pub use tasks::Task;

/// Re-export common types for ease of development use.
pub mod prelude {
    pub use crate::error_boundary::ErrorBoundary;
    pub use crate::render_error::{CapturedError, RenderError, SuspendedTask};
    pub use crate::resource::{Resource, ResourceState};
    pub use crate::runtime::{spawn, BoundaryId, Runtime, RuntimeGuard};
    pub use crate::suspense::SuspenseBoundary;
    pub use crate::tasks::Task;
}

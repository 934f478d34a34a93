use crate::render_error::{RenderError, SuspendedTask};
use crate::runtime::{spawn, BoundaryId, Runtime};
use crate::tasks::SchedulerMsg;
use futures_channel::mpsc::UnboundedSender;
use std::cell::RefCell;

/// A boundary that renders a fallback while its subtree is pending.
///
/// When the view it wraps suspends, the boundary renders its configured
/// fallback instead and attaches exactly one listener to the suspension token.
/// Once the token settles - with a value or with an error, the boundary does
/// not care which - it marks itself dirty through the scheduler so the owner
/// triggers one more render attempt. That next attempt reads the settled
/// resource and either produces content or raises a genuine error for an
/// enclosing [`ErrorBoundary`](crate::ErrorBoundary).
///
/// Boundaries are independent: each waits on its own token, indefinitely, and
/// a settlement whose subtree has since moved on is a harmless extra
/// dirty-mark.
pub struct SuspenseBoundary {
    id: BoundaryId,
    fallback: String,
    // The token itself, not its task id: ids are recycled by the runtime once
    // a task completes, so only signal identity can tell operations apart
    waiting_on: RefCell<Option<SuspendedTask>>,
    sender: UnboundedSender<SchedulerMsg>,
}

impl SuspenseBoundary {
    /// Create a boundary with the given fallback content, registered with the
    /// current runtime. Panics outside of a [`RuntimeGuard`](crate::RuntimeGuard).
    pub fn new(fallback: impl Into<String>) -> Self {
        let (id, sender) = Runtime::with(|rt| (rt.register_boundary(), rt.sender.clone()))
            .expect("to be in a suspense runtime");
        Self {
            id,
            fallback: fallback.into(),
            waiting_on: RefCell::new(None),
            sender,
        }
    }

    /// The boundary's id in the runtime's dirty set.
    pub fn id(&self) -> BoundaryId {
        self.id
    }

    /// Attempt to render the wrapped view.
    ///
    /// Returns the view's content, or the fallback if the view suspended.
    /// Aborts are not interpreted here - they propagate to the enclosing
    /// error boundary.
    pub fn render(
        &self,
        view: impl FnOnce() -> Result<String, RenderError>,
    ) -> Result<String, RenderError> {
        match view() {
            Ok(content) => {
                self.waiting_on.replace(None);
                Ok(content)
            }
            Err(RenderError::Suspended(token)) => {
                // One listener per pending operation, no matter how many
                // render attempts see the same token
                let already_waiting = self
                    .waiting_on
                    .borrow()
                    .as_ref()
                    .is_some_and(|waiting| *waiting == token);
                if !already_waiting {
                    tracing::trace!(boundary = self.id.0, task = token.task().0, "suspended");

                    let settled = token.settled();
                    let sender = self.sender.clone();
                    let id = self.id;
                    spawn(async move {
                        settled.await;
                        _ = sender.unbounded_send(SchedulerMsg::Immediate(id));
                    });

                    self.waiting_on.replace(Some(token));
                }
                Ok(self.fallback.clone())
            }
            Err(err @ RenderError::Aborted(_)) => {
                self.waiting_on.replace(None);
                Err(err)
            }
        }
    }
}

use crate::render_error::{CapturedError, RenderError};
use std::cell::RefCell;

/// A boundary that will capture any errors from child views.
///
/// Holds the last caught error, or none. An aborted render trips the boundary
/// and replaces the subtree with an error display; once tripped it stays
/// tripped - there is no reset path short of discarding the boundary.
///
/// Suspensions are not errors and pass through untouched: only a
/// [`SuspenseBoundary`](crate::SuspenseBoundary) may interpret them.
#[derive(Default)]
pub struct ErrorBoundary {
    error: RefCell<Option<CapturedError>>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last caught error, if the boundary has tripped.
    pub fn error(&self) -> Option<CapturedError> {
        self.error.borrow().clone()
    }

    /// Render the wrapped subtree, capturing any abort it raises.
    pub fn render(
        &self,
        inner: impl FnOnce() -> Result<String, RenderError>,
    ) -> Result<String, RenderError> {
        if let Some(error) = &*self.error.borrow() {
            return Ok(Self::display(error));
        }

        match inner() {
            Ok(content) => Ok(content),
            Err(RenderError::Aborted(error)) => {
                tracing::debug!(%error, "error boundary tripped");
                *self.error.borrow_mut() = Some(error.clone());
                Ok(Self::display(&error))
            }
            Err(suspended @ RenderError::Suspended(_)) => Err(suspended),
        }
    }

    fn display(error: &CapturedError) -> String {
        format!("Error: {error}")
    }
}

use crate::settle::{SettleFuture, SettleSignal};
use crate::tasks::Task;
use std::fmt::{Debug, Display};
use std::rc::Rc;

/// The reason a render attempt returned early.
///
/// A read of a not-yet-settled resource and a read of a failed resource travel
/// through the same `Result` channel, but the two are distinguishable by tag:
/// a [`SuspenseBoundary`](crate::SuspenseBoundary) handles `Suspended` and an
/// [`ErrorBoundary`](crate::ErrorBoundary) handles `Aborted`. A suspension is
/// control flow, never an error.
#[derive(Clone, PartialEq, Debug)]
pub enum RenderError {
    /// The render function returned early because a value it read is still
    /// pending
    Suspended(SuspendedTask),

    /// The render function failed
    Aborted(CapturedError),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suspended(task) => write!(f, "Render suspended on {task:?}"),
            Self::Aborted(e) => write!(f, "Render aborted: {e}"),
        }
    }
}

impl<E: std::error::Error + 'static> From<E> for RenderError {
    fn from(e: E) -> Self {
        Self::Aborted(CapturedError::new(e))
    }
}

/// The suspension token surfaced by reading a pending resource.
///
/// Every read of the same pending resource yields the same token, and
/// [`SuspendedTask::settled`] lets an orchestrator wait for the underlying
/// operation to settle. Token equality is identity of the settle signal, not
/// the task id: the runtime recycles task ids once a task completes, so two
/// distinct operations can share an id but never a signal. The token carries
/// no success/failure information - interpreting the settled state is the
/// next read's job.
#[derive(Clone)]
pub struct SuspendedTask {
    task: Task,
    signal: SettleSignal,
}

impl SuspendedTask {
    pub(crate) fn new(task: Task, signal: SettleSignal) -> Self {
        Self { task, signal }
    }

    /// The task driving the pending operation.
    pub fn task(&self) -> Task {
        self.task
    }

    /// A future that resolves once the operation settles, whether with a value
    /// or with an error.
    pub fn settled(&self) -> SettleFuture {
        self.signal.subscribe()
    }
}

impl PartialEq for SuspendedTask {
    fn eq(&self, other: &Self) -> bool {
        self.signal.ptr_eq(&other.signal)
    }
}

impl Debug for SuspendedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SuspendedTask").field(&self.task.0).finish()
    }
}

/// An error captured from a failed render, cheap to clone and re-raise.
///
/// Reads of a failed resource return the same captured error every time, so
/// equality is identity of the underlying allocation rather than message
/// comparison.
#[derive(Clone)]
pub struct CapturedError {
    error: Rc<dyn std::error::Error + 'static>,
}

impl CapturedError {
    pub fn new<E: std::error::Error + 'static>(error: E) -> Self {
        Self {
            error: Rc::new(error),
        }
    }
}

impl PartialEq for CapturedError {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.error, &other.error)
    }
}

impl Display for CapturedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.error, f)
    }
}

impl Debug for CapturedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.error, f)
    }
}

use crate::render_error::{CapturedError, RenderError, SuspendedTask};
use crate::runtime::spawn;
use crate::settle::{SettleFuture, SettleSignal};
use crate::tasks::Task;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

/// The coarse state of a [`Resource`], for inspection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ResourceState {
    /// The resource's operation has not settled yet
    Loading,

    /// The resource's operation produced a value
    Ready,

    /// The resource's operation failed
    Failed,
}

/// A memoizing wrapper around one pending operation.
///
/// A resource is constructed over a single future and is in exactly one of
/// three states at any instant: loading, ready, or failed. The transition out
/// of loading happens exactly once, driven by the operation's completion, and
/// there is no way back - superseding a resource means constructing a new one.
///
/// [`Resource::read`] never blocks. While the operation is pending it returns
/// [`RenderError::Suspended`] carrying the same token on every call; once
/// settled it returns the same value or the same captured error on every call.
///
/// Dropping a resource does not cancel the operation: the spawned task runs to
/// completion and its settlement is a no-op nothing observes.
pub struct Resource<T> {
    value: Rc<RefCell<Option<Result<T, CapturedError>>>>,
    token: SuspendedTask,
}

impl<T: Clone + 'static> Resource<T> {
    /// Wrap a pending operation, spawning it onto the current runtime.
    ///
    /// The completion continuation is registered here, once, so reads while
    /// pending have no side effects at all. Panics outside of a
    /// [`RuntimeGuard`](crate::RuntimeGuard).
    pub fn new<F, E>(fut: F) -> Self
    where
        F: Future<Output = Result<T, E>> + 'static,
        E: std::error::Error + 'static,
    {
        let value: Rc<RefCell<Option<Result<T, CapturedError>>>> =
            Rc::new(RefCell::new(None));
        let signal = SettleSignal::default();

        let task = spawn({
            let value = value.clone();
            let signal = signal.clone();
            async move {
                let result = fut.await.map_err(CapturedError::new);
                tracing::trace!(ok = result.is_ok(), "resource settled");
                *value.borrow_mut() = Some(result);
                signal.send();
            }
        });

        Self {
            value,
            token: SuspendedTask::new(task, signal),
        }
    }

    /// Read the resource without blocking.
    ///
    /// - Loading: returns the resource's suspension token, the same one on
    ///   every call until settlement.
    /// - Ready: returns a clone of the value, with no side effect.
    /// - Failed: re-raises the captured error.
    pub fn read(&self) -> Result<T, RenderError> {
        match &*self.value.borrow() {
            None => Err(RenderError::Suspended(self.token.clone())),
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(error)) => Err(RenderError::Aborted(error.clone())),
        }
    }

    /// Which of the three states the resource is currently in.
    pub fn state(&self) -> ResourceState {
        match &*self.value.borrow() {
            None => ResourceState::Loading,
            Some(Ok(_)) => ResourceState::Ready,
            Some(Err(_)) => ResourceState::Failed,
        }
    }

    /// The task driving the wrapped operation.
    pub fn task(&self) -> Task {
        self.token.task()
    }

    /// A future that resolves once the operation settles, successfully or not.
    ///
    /// Resolves immediately if the resource has already settled.
    pub fn settled(&self) -> SettleFuture {
        self.token.settled()
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            token: self.token.clone(),
        }
    }
}

use crate::runtime::BoundaryId;
use futures_util::task::ArcWake;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Waker;

/// A task's unique identifier.
///
/// `Task` identifies a future that has been spawned onto the runtime. Resources
/// use it to give their suspension token a stable identity, so a boundary can
/// tell "still the same pending operation" from "a new one".
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Task(pub(crate) usize);

/// A future living in the runtime's task slab.
///
/// The waker is the task itself: waking it enqueues a [`SchedulerMsg`] so the
/// runtime knows to poll it again on the next pump.
pub(crate) struct LocalTask {
    pub(crate) task: RefCell<Pin<Box<dyn Future<Output = ()> + 'static>>>,
    pub(crate) waker: Waker,
}

/// The type of message that can be sent to the scheduler.
#[derive(Debug)]
pub(crate) enum SchedulerMsg {
    /// A boundary needs another render attempt
    Immediate(BoundaryId),

    /// A task has woken and needs to be progressed
    TaskNotified(Task),
}

pub(crate) struct LocalTaskHandle {
    pub(crate) id: Task,
    pub(crate) tx: futures_channel::mpsc::UnboundedSender<SchedulerMsg>,
}

impl ArcWake for LocalTaskHandle {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        _ = arc_self
            .tx
            .unbounded_send(SchedulerMsg::TaskNotified(arc_self.id));
    }
}

use crate::tasks::{LocalTask, LocalTaskHandle, SchedulerMsg, Task};
use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use rustc_hash::FxHashSet;
use slab::Slab;
use std::cell::{Cell, RefCell};
use std::future::{poll_fn, Future};
use std::pin::pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

thread_local! {
    static RUNTIMES: RefCell<Vec<Rc<Runtime>>> = const { RefCell::new(Vec::new()) };
}

/// Pushes a new runtime onto the stack
fn push_runtime(runtime: Rc<Runtime>) {
    RUNTIMES.with(|stack| stack.borrow_mut().push(runtime));
}

/// Pops a runtime off the stack
fn pop_runtime() {
    RUNTIMES.with(|stack| stack.borrow_mut().pop());
}

/// Spawn a future onto the current runtime.
///
/// The future runs on the same thread as everything else and is polled whenever
/// the runtime is pumped. Panics outside of a [`RuntimeGuard`].
pub fn spawn(fut: impl Future<Output = ()> + 'static) -> Task {
    Runtime::with(|rt| rt.spawn(fut)).expect("to be in a suspense runtime")
}

/// Identifies a rendering boundary registered with the runtime.
///
/// Boundaries mark themselves dirty through the scheduler when the operation
/// they are waiting on settles; the owner of the runtime drains the dirty set
/// and re-renders.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BoundaryId(pub(crate) usize);

/// The single-threaded cooperative scheduler everything runs on.
///
/// There is no parallelism here: pending operations interleave on one thread,
/// driven by whoever awaits [`Runtime::wait_for_work`] or [`Runtime::drive`].
/// Tasks live in a slab and wake themselves by pushing a message onto the
/// scheduler channel.
pub struct Runtime {
    pub(crate) tasks: RefCell<Slab<Rc<LocalTask>>>,
    pub(crate) sender: UnboundedSender<SchedulerMsg>,
    rx: RefCell<UnboundedReceiver<SchedulerMsg>>,
    dirty: RefCell<FxHashSet<BoundaryId>>,
    next_boundary: Cell<usize>,
}

impl Runtime {
    pub fn new() -> Rc<Self> {
        let (sender, rx) = futures_channel::mpsc::unbounded();
        Rc::new(Self {
            tasks: RefCell::new(Slab::new()),
            sender,
            rx: RefCell::new(rx),
            dirty: RefCell::new(FxHashSet::default()),
            next_boundary: Cell::new(0),
        })
    }

    /// Get the current runtime, if one is installed on this thread.
    pub fn current() -> Option<Rc<Self>> {
        RUNTIMES.with(|stack| stack.borrow().last().cloned())
    }

    /// Runs a function with the current runtime
    pub(crate) fn with<F, R>(f: F) -> Option<R>
    where
        F: FnOnce(&Runtime) -> R,
    {
        RUNTIMES.with(|stack| {
            let stack = stack.borrow();
            stack.last().map(|r| f(r))
        })
    }

    /// Start a new future on the same thread as the rest of the runtime.
    ///
    /// The future is held until it completes; there is no cancellation
    /// primitive, so a superseded task simply runs to completion with nothing
    /// left to observe its result.
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) -> Task {
        let task_id = {
            let mut tasks = self.tasks.borrow_mut();
            let entry = tasks.vacant_entry();
            let task_id = Task(entry.key());
            entry.insert(Rc::new(LocalTask {
                task: RefCell::new(Box::pin(task)),
                waker: futures_util::task::waker(Arc::new(LocalTaskHandle {
                    id: task_id,
                    tx: self.sender.clone(),
                })),
            }));
            task_id
        };

        tracing::trace!(task = task_id.0, "spawned task");

        self.sender
            .unbounded_send(SchedulerMsg::TaskNotified(task_id))
            .expect("scheduler to be listening");

        task_id
    }

    pub(crate) fn handle_task_wakeup(&self, id: Task) -> Poll<()> {
        // Clone the Rc out so no borrow of the slab is held while polling
        let task = self.tasks.borrow().get(id.0).cloned();

        // The task was removed from the scheduler, so we can just ignore it
        let Some(task) = task else {
            return Poll::Ready(());
        };

        let mut cx = Context::from_waker(&task.waker);
        let poll_result = task.task.borrow_mut().as_mut().poll(&mut cx);

        if poll_result.is_ready() {
            tracing::trace!(task = id.0, "task completed");
            self.tasks.borrow_mut().try_remove(id.0);
        }

        poll_result
    }

    /// Hand out an id for a new boundary.
    pub(crate) fn register_boundary(&self) -> BoundaryId {
        let id = BoundaryId(self.next_boundary.get());
        self.next_boundary.set(id.0 + 1);
        id
    }

    /// Mark a boundary as needing another render attempt.
    pub fn mark_dirty(&self, id: BoundaryId) {
        tracing::trace!(boundary = id.0, "boundary marked dirty");
        self.dirty.borrow_mut().insert(id);
    }

    /// Whether any boundary is waiting for a render attempt.
    pub fn has_dirty(&self) -> bool {
        !self.dirty.borrow().is_empty()
    }

    /// Drain the set of boundaries that need a render attempt.
    pub fn take_dirty(&self) -> FxHashSet<BoundaryId> {
        std::mem::take(&mut *self.dirty.borrow_mut())
    }

    /// Drain the scheduler channel, polling woken tasks and collecting dirty
    /// boundary marks.
    fn pump(&self, cx: &mut Context<'_>) {
        let mut rx = self.rx.borrow_mut();
        while let Poll::Ready(Some(msg)) = rx.poll_next_unpin(cx) {
            match msg {
                SchedulerMsg::TaskNotified(id) => {
                    _ = self.handle_task_wakeup(id);
                }
                SchedulerMsg::Immediate(id) => {
                    self.mark_dirty(id);
                }
            }
        }
    }

    /// Wait until at least one boundary needs a render attempt.
    ///
    /// This is cancel safe: messages already processed stay processed and the
    /// dirty set persists, so it can sit inside a `select!` loop. Callers are
    /// expected to hold a [`RuntimeGuard`] so tasks polled here can spawn.
    pub async fn wait_for_work(&self) {
        poll_fn(|cx| {
            self.pump(cx);
            if self.has_dirty() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }

    /// Poll a future to completion while keeping the runtime's tasks moving.
    pub async fn drive<F: Future>(&self, fut: F) -> F::Output {
        let mut fut = pin!(fut);
        poll_fn(|cx| {
            self.pump(cx);
            fut.as_mut().poll(cx)
        })
        .await
    }
}

/// Installs a runtime as the current one for the lifetime of the guard.
///
/// [`spawn`] and boundary construction resolve the runtime through this.
pub struct RuntimeGuard(#[allow(dead_code)] Rc<Runtime>);

impl RuntimeGuard {
    pub fn new(runtime: Rc<Runtime>) -> Self {
        push_runtime(runtime.clone());
        Self(runtime)
    }
}

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        pop_runtime();
    }
}

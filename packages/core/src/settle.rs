use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// A one-shot settlement notification that any number of tasks can listen for.
///
/// Unlike a plain waker list, subscribing after [`SettleSignal::send`] yields a
/// future that is already resolved - a suspension token can outlive the render
/// that produced it, so late listeners must not hang.
#[derive(Clone, Default)]
pub(crate) struct SettleSignal {
    inner: Rc<RefCell<SignalInner>>,
}

#[derive(Default)]
struct SignalInner {
    settled: bool,
    listeners: Vec<Rc<RefCell<ListenerInner>>>,
}

impl SettleSignal {
    /// Send the signal to all listening tasks at once.
    pub(crate) fn send(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.settled = true;
        for listener in inner.listeners.drain(..) {
            let mut listener = listener.borrow_mut();
            listener.resolved = true;
            if let Some(waker) = listener.waker.take() {
                waker.wake();
            }
        }
    }

    /// Whether two handles notify for the same operation.
    ///
    /// Signal identity is the allocation itself, which is never reused, so
    /// this is safe where recyclable ids are not.
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Create a future that resolves when the signal is sent.
    pub(crate) fn subscribe(&self) -> SettleFuture {
        let mut inner = self.inner.borrow_mut();
        let listener = Rc::new(RefCell::new(ListenerInner {
            resolved: inner.settled,
            waker: None,
        }));
        if !inner.settled {
            inner.listeners.push(listener.clone());
        }
        SettleFuture { inner: listener }
    }
}

struct ListenerInner {
    resolved: bool,
    waker: Option<Waker>,
}

/// A future that resolves once the operation behind a suspension token has
/// settled, successfully or not.
pub struct SettleFuture {
    inner: Rc<RefCell<ListenerInner>>,
}

impl Future for SettleFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.resolved {
            Poll::Ready(())
        } else {
            inner.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

impl std::fmt::Debug for SettleFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettleFuture")
            .field("resolved", &self.inner.borrow().resolved)
            .finish()
    }
}

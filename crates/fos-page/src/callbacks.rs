//! Event streams
//!
//! An ordered list of listeners keyed by subscription handle. Firing calls
//! every listener in insertion order and folds whatever completions they
//! hand back into a single `Fired` signal.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures_util::future::{join_all, FutureExt, LocalBoxFuture};

/// Handle returned by `Callbacks::add`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum Listener<S: ?Sized, A: ?Sized> {
    Sync(Rc<dyn Fn(&S, &A)>),
    Async(Rc<dyn Fn(&S, &A) -> LocalBoxFuture<'static, anyhow::Result<()>>>),
}

impl<S: ?Sized, A: ?Sized> Clone for Listener<S, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(f) => Self::Sync(Rc::clone(f)),
            Self::Async(f) => Self::Async(Rc::clone(f)),
        }
    }
}

/// Observer list taking `(sender, args)`
pub struct Callbacks<S: ?Sized, A: ?Sized> {
    listeners: RefCell<Vec<(SubscriptionId, Listener<S, A>)>>,
    next_id: Cell<u64>,
}

impl<S: ?Sized, A: ?Sized> Default for Callbacks<S, A> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<S: ?Sized, A: ?Sized> Callbacks<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, listener: Listener<S, A>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Subscribe a synchronous listener
    pub fn add<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S, &A) + 'static,
    {
        self.push(Listener::Sync(Rc::new(listener)))
    }

    /// Subscribe a listener whose work completes asynchronously.
    ///
    /// The listener itself runs at fire time; the future it returns is part
    /// of the `Fired` signal.
    pub fn add_async<F, Fut>(&self, listener: F) -> SubscriptionId
    where
        S: 'static,
        A: 'static,
        F: Fn(&S, &A) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.push(Listener::Async(Rc::new(move |s: &S, a: &A| listener(s, a).boxed_local())))
    }

    /// Unsubscribe; returns false if the handle was unknown
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Invoke every listener in insertion order.
    ///
    /// Works on a snapshot: listeners added or removed while firing take
    /// effect on the next fire.
    pub fn fire(&self, sender: &S, args: &A) -> Fired {
        let snapshot: Vec<Listener<S, A>> = self.listeners.borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        let mut pending = Vec::new();
        for listener in snapshot {
            match listener {
                Listener::Sync(f) => f(sender, args),
                Listener::Async(f) => pending.push(f(sender, args)),
            }
        }
        Fired { pending }
    }
}

impl<S: ?Sized, A: ?Sized> fmt::Debug for Callbacks<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Completion signal of one `Callbacks::fire`
#[must_use = "async listener work only progresses when the signal is awaited"]
pub struct Fired {
    pending: Vec<LocalBoxFuture<'static, anyhow::Result<()>>>,
}

impl Fired {
    /// True when no listener handed back outstanding work
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of listeners with outstanding work
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Wait for all outstanding listener work; reports the first failure
    /// in insertion order after every completion has settled.
    pub async fn wait(self) -> anyhow::Result<()> {
        join_all(self.pending)
            .await
            .into_iter()
            .collect::<anyhow::Result<Vec<()>>>()
            .map(|_| ())
    }
}

impl fmt::Debug for Fired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fired")
            .field("pending", &self.pending.len())
            .finish()
    }
}

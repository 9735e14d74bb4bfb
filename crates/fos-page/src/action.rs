//! Navigation actions
//!
//! The code a route runs against its page. An action either finishes when
//! it returns or hands back a future the page waits on before firing
//! `load`.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture};

use crate::Page;

/// What an invoked action handed back
pub enum ActionOutcome {
    /// Work finished inside the call
    Ready,
    /// Work finishes when the future settles
    Pending(LocalBoxFuture<'static, anyhow::Result<()>>),
}

type ActionFn = Rc<dyn Fn(&Rc<Page>) -> anyhow::Result<ActionOutcome>>;

/// A page's navigation action
#[derive(Clone)]
pub enum Action {
    /// Nothing invocable was resolved for the page (e.g. a route whose
    /// module exported something that is not a function)
    Unbound,
    Bound(ActionFn),
}

impl Action {
    /// Wrap a synchronous action
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Rc<Page>) -> anyhow::Result<()> + 'static,
    {
        Self::Bound(Rc::new(move |page: &Rc<Page>| f(page).map(|()| ActionOutcome::Ready)))
    }

    /// Wrap an action that completes asynchronously
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(&Rc<Page>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        Self::Bound(Rc::new(move |page: &Rc<Page>| {
            Ok(ActionOutcome::Pending(f(page).boxed_local()))
        }))
    }

    /// Wrap a raw action that decides per call whether it finished
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Rc<Page>) -> anyhow::Result<ActionOutcome> + 'static,
    {
        Self::Bound(Rc::new(f))
    }

    pub fn unbound() -> Self {
        Self::Unbound
    }

    pub fn is_invocable(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => f.write_str("Action::Unbound"),
            Self::Bound(_) => f.write_str("Action::Bound(..)"),
        }
    }
}

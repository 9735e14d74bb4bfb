//! Page lifecycle
//!
//! A page wraps one element and the action that fills it. Its lifecycle
//! runs `load -> show/hide ... -> close`; every phase fires a pair of
//! events around the work it delegates.
//!
//! Operations do their synchronous part when called: `show` fires
//! `showing` and starts the display strategy before returning, `close`
//! is finished by the time it returns. The returned futures only cover
//! what is left.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use fos_dom::Element;
use futures_util::future::{self, FutureExt, LocalBoxFuture};
use smol::channel::{self, Receiver};
use smol::{LocalExecutor, Task};

use crate::{
    Action, ActionOutcome, Callbacks, PageData, PageDisplayer, PageError, PageFault, PageMaster,
    PageService, Service, SharedError, TransitionPhase,
};

/// Event stream of a page, fired with `(page, data)`
pub type PageCallbacks = Callbacks<Rc<Page>, PageData>;

/// Last lifecycle phase a page entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Constructed,
    Loading,
    Loaded,
    Showing,
    Shown,
    Hiding,
    Hidden,
    Closing,
    /// Terminal
    Closed,
}

/// Everything a page is built from
pub struct PageParams {
    /// Owning host; not kept alive by the page
    pub app: Weak<dyn PageMaster>,
    pub action: Action,
    pub element: Element,
    pub displayer: Rc<dyn PageDisplayer>,
    pub name: String,
    pub data: PageData,
    /// Scheduler the first action run and listener completions go on
    pub executor: Rc<LocalExecutor<'static>>,
}

/// Result of the self-scheduled first action run.
///
/// Dropping it leaves the run alone; it only carries the outcome.
pub struct InitialLoad {
    page: String,
    result: Receiver<Result<(), PageError>>,
}

impl InitialLoad {
    /// Wait for the first run. A run cancelled by `close`, or by the page
    /// being dropped before its turn, reports `PageError::Closed`.
    pub async fn wait(self) -> Result<(), PageError> {
        match self.result.recv().await {
            Ok(result) => result,
            Err(_) => Err(PageError::Closed { page: self.page }),
        }
    }
}

impl fmt::Debug for InitialLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitialLoad")
            .field("page", &self.page)
            .field("settled", &!self.result.is_empty())
            .finish()
    }
}

pub struct Page {
    name: String,
    element: Element,
    app: Weak<dyn PageMaster>,
    displayer: Rc<dyn PageDisplayer>,
    action: Action,
    data: PageData,
    executor: Rc<LocalExecutor<'static>>,
    state: Cell<PageState>,
    first_run: RefCell<Option<Task<()>>>,
    initial_load: RefCell<Option<InitialLoad>>,

    /// Fired after the action has finished
    pub load: PageCallbacks,
    /// Fired before the page is shown
    pub showing: PageCallbacks,
    /// Fired once the page is on screen
    pub shown: PageCallbacks,
    pub hiding: PageCallbacks,
    pub hidden: PageCallbacks,
    pub closing: PageCallbacks,
    pub closed: PageCallbacks,
}

impl Page {
    /// Tag of the element hosts create for a page
    pub const TAG_NAME: &'static str = "div";

    /// Build a page and schedule its first action run on the next turn of
    /// `params.executor`, so listeners attached right after construction
    /// still see the first `load`.
    pub fn new(params: PageParams) -> Rc<Self> {
        let PageParams { app, action, element, displayer, name, data, executor } = params;

        let page = Rc::new(Self {
            name,
            element,
            app,
            displayer,
            action,
            data,
            executor: Rc::clone(&executor),
            state: Cell::new(PageState::Constructed),
            first_run: RefCell::new(None),
            initial_load: RefCell::new(None),
            load: Callbacks::new(),
            showing: Callbacks::new(),
            shown: Callbacks::new(),
            hiding: Callbacks::new(),
            hidden: Callbacks::new(),
            closing: Callbacks::new(),
            closed: Callbacks::new(),
        });

        let (tx, rx) = channel::bounded(1);
        let weak = Rc::downgrade(&page);
        let task = executor.spawn(async move {
            let Some(page) = weak.upgrade() else {
                return;
            };
            let result = page.reload().await;
            if let Err(e) = &result {
                tracing::error!(page = %page.name, error = %e, "initial page action failed");
            }
            // nobody may be listening; the run itself already happened
            let _ = tx.try_send(result);
        });
        *page.first_run.borrow_mut() = Some(task);
        *page.initial_load.borrow_mut() = Some(InitialLoad { page: page.name.clone(), result: rx });

        tracing::debug!(page = %page.name, "page constructed");
        page
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element the page renders into
    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn data(&self) -> &PageData {
        &self.data
    }

    /// Owning host, while it is alive
    pub fn app(&self) -> Option<Rc<dyn PageMaster>> {
        self.app.upgrade()
    }

    pub fn state(&self) -> PageState {
        self.state.get()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state.get(), PageState::Closing | PageState::Closed)
    }

    /// Take the outcome handle of the self-scheduled first action run.
    /// Yields `Some` once. The run happens whether or not the handle is
    /// taken or awaited.
    pub fn initial_load(&self) -> Option<InitialLoad> {
        self.initial_load.borrow_mut().take()
    }

    /// Run the action again and fire `load` once it has finished.
    ///
    /// The action is invoked before this returns. A synchronous action
    /// fires `load` before this returns too; otherwise `load` fires when
    /// the action's future settles successfully.
    pub fn reload(self: &Rc<Self>) -> LocalBoxFuture<'static, Result<(), PageError>> {
        self.execute_page_action()
    }

    fn execute_page_action(self: &Rc<Self>) -> LocalBoxFuture<'static, Result<(), PageError>> {
        if let Err(e) = self.ensure_open() {
            return future::ready(Err(e)).boxed_local();
        }
        let Action::Bound(action) = &self.action else {
            return future::ready(Err(PageError::ActionType { page: self.name.clone() })).boxed_local();
        };

        self.enter(PageState::Loading);
        match action(self) {
            Err(source) => {
                future::ready(Err(PageError::Action { page: self.name.clone(), source })).boxed_local()
            }
            Ok(ActionOutcome::Ready) => {
                // the action may have closed its own page
                if let Err(e) = self.ensure_open() {
                    return future::ready(Err(e)).boxed_local();
                }
                self.on_load();
                future::ready(Ok(())).boxed_local()
            }
            Ok(ActionOutcome::Pending(work)) => {
                let page = Rc::clone(self);
                async move {
                    work.await
                        .map_err(|source| PageError::Action { page: page.name.clone(), source })?;
                    page.ensure_open()?;
                    page.on_load();
                    Ok(())
                }
                .boxed_local()
            }
        }
    }

    /// Show this page in place of the host's current page.
    ///
    /// When the host's current page is this page, the strategy is given no
    /// previous page.
    pub fn show(self: &Rc<Self>) -> LocalBoxFuture<'static, Result<(), PageError>> {
        if let Err(e) = self.ensure_open() {
            return future::ready(Err(e)).boxed_local();
        }

        self.enter(PageState::Showing);
        self.dispatch(&self.showing, "showing");

        let previous = self.app()
            .and_then(|app| app.current_page())
            .filter(|current| !Rc::ptr_eq(current, self));
        let transition = self.displayer.show(self, previous.as_ref());

        let page = Rc::clone(self);
        async move {
            transition.await.map_err(|source| PageError::Transition {
                page: page.name.clone(),
                phase: TransitionPhase::Show,
                source,
            })?;
            page.ensure_open()?;
            page.enter(PageState::Shown);
            page.dispatch(&page.shown, "shown");
            Ok(())
        }
        .boxed_local()
    }

    /// Hide this page, bringing back `current_page` if given
    pub fn hide(
        self: &Rc<Self>,
        current_page: Option<&Rc<Page>>,
    ) -> LocalBoxFuture<'static, Result<(), PageError>> {
        if let Err(e) = self.ensure_open() {
            return future::ready(Err(e)).boxed_local();
        }

        self.enter(PageState::Hiding);
        self.dispatch(&self.hiding, "hiding");

        let transition = self.displayer.hide(self, current_page);

        let page = Rc::clone(self);
        async move {
            transition.await.map_err(|source| PageError::Transition {
                page: page.name.clone(),
                phase: TransitionPhase::Hide,
                source,
            })?;
            page.ensure_open()?;
            page.enter(PageState::Hidden);
            page.dispatch(&page.hidden, "hidden");
            Ok(())
        }
        .boxed_local()
    }

    /// Close the page: fire `closing`, detach the element, fire `closed`.
    ///
    /// All of it happens before this returns; the future is ready. Closing
    /// a closed page does nothing. A first action run that has not started
    /// yet is cancelled.
    pub fn close(self: &Rc<Self>) -> future::Ready<()> {
        if self.is_closed() {
            return future::ready(());
        }

        self.enter(PageState::Closing);
        self.dispatch(&self.closing, "closing");

        self.element.remove();
        self.first_run.borrow_mut().take();

        self.enter(PageState::Closed);
        self.dispatch(&self.closed, "closed");
        future::ready(())
    }

    /// Create a service whose errors are reported to the host as coming
    /// from this page
    pub fn create_service<T: PageService>(self: &Rc<Self>) -> T {
        let service = T::create();
        let page = Rc::downgrade(self);
        service.error().add(move |_, error: &SharedError| {
            if let Some(page) = page.upgrade() {
                page.report_error(Rc::clone(error));
            }
        });
        service
    }

    pub fn create_default_service(self: &Rc<Self>) -> Service {
        self.create_service::<Service>()
    }

    /// Hand an error to the host's error stream, tagged with this page
    pub fn report_error(self: &Rc<Self>, error: SharedError) {
        let Some(app) = self.app() else {
            tracing::warn!(page = %self.name, error = %error, "host dropped, discarding page error");
            return;
        };

        let fault = PageFault { error, page: Rc::clone(self) };
        let fired = app.error().fire(&*app, &fault);
        if !fired.is_settled() {
            let name = self.name.clone();
            self.executor
                .spawn(async move {
                    if let Err(e) = fired.wait().await {
                        tracing::warn!(page = %name, error = %e, "host error listener failed");
                    }
                })
                .detach();
        }
    }

    fn ensure_open(&self) -> Result<(), PageError> {
        if self.is_closed() {
            return Err(PageError::Closed { page: self.name.clone() });
        }
        Ok(())
    }

    fn enter(&self, state: PageState) {
        tracing::debug!(page = %self.name, from = ?self.state.get(), to = ?state, "page state");
        self.state.set(state);
    }

    fn on_load(self: &Rc<Self>) {
        self.enter(PageState::Loaded);
        self.dispatch(&self.load, "load");
    }

    /// Fire a lifecycle event. Listener completions run on the executor and
    /// their failures go to the host; they never hold up the lifecycle.
    fn dispatch(self: &Rc<Self>, stream: &PageCallbacks, event: &'static str) {
        tracing::trace!(page = %self.name, event, listeners = stream.len(), "firing page event");
        let fired = stream.fire(self, &self.data);
        if fired.is_settled() {
            return;
        }

        let page = Rc::downgrade(self);
        self.executor
            .spawn(async move {
                if let Err(e) = fired.wait().await {
                    if let Some(page) = page.upgrade() {
                        page.report_error(Rc::new(e.context(format!("{event} listener failed"))));
                    }
                }
            })
            .detach();
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("name", &self.name)
            .field("state", &self.state.get())
            .field("element", &self.element)
            .field("action", &self.action)
            .finish()
    }
}

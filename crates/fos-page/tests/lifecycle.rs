//! Lifecycle tests - construction, load, show/hide, close
//!
//! Pages are driven on a `LocalExecutor`; `drain` runs every task that is
//! ready, i.e. one or more scheduler turns.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use anyhow::anyhow;
use fos_dom::{Document, Element};
use fos_page::{
    Action, Page, PageDisplayer, PageError, PageMaster, PageParams, PageState, SimpleHost,
    StyleDisplayer, Transition, TransitionPhase,
};
use futures_util::future::FutureExt;
use smol::LocalExecutor;

// ============================================================================
// FIXTURES
// ============================================================================

struct Fixture {
    ex: Rc<LocalExecutor<'static>>,
    host: Rc<SimpleHost>,
    doc: Document,
}

impl Fixture {
    fn new() -> Self {
        Self {
            ex: Rc::new(LocalExecutor::new()),
            host: SimpleHost::new(),
            doc: Document::new("app://test"),
        }
    }

    fn app(&self) -> Weak<dyn PageMaster> {
        let app: Rc<dyn PageMaster> = self.host.clone();
        Rc::downgrade(&app)
    }

    fn element_in(&self, container: &Element) -> Element {
        let element = self.doc.create_element(Page::TAG_NAME);
        container.append_child(&element).unwrap();
        element
    }

    fn page_in(
        &self,
        name: &str,
        container: &Element,
        action: Action,
        displayer: Rc<dyn PageDisplayer>,
    ) -> Rc<Page> {
        Page::new(PageParams {
            app: self.app(),
            action,
            element: self.element_in(container),
            displayer,
            name: name.to_string(),
            data: Default::default(),
            executor: Rc::clone(&self.ex),
        })
    }

    fn page(&self, name: &str, action: Action) -> Rc<Page> {
        self.page_in(name, self.doc.body(), action, Rc::new(StyleDisplayer::new()))
    }

    fn drain(&self) {
        while self.ex.try_tick() {}
    }
}

type Log = Rc<RefCell<Vec<String>>>;

fn log_event(log: &Log, page: &Page, event: &str) {
    log.borrow_mut().push(format!("{event}:{}", page.name()));
}

/// Strategy that records its calls and can hold a transition open
struct RecordingDisplayer {
    log: Log,
    gate: Option<smol::channel::Receiver<()>>,
    fail: bool,
}

impl RecordingDisplayer {
    fn new(log: &Log) -> Self {
        Self { log: Rc::clone(log), gate: None, fail: false }
    }

    fn finish(&self) -> Transition {
        let gate = self.gate.clone();
        let fail = self.fail;
        async move {
            if let Some(gate) = gate {
                gate.recv().await?;
            }
            if fail {
                return Err(anyhow!("animation aborted"));
            }
            Ok(())
        }
        .boxed_local()
    }

    fn record(&self, op: &str, target: &Page, previous: Option<&Rc<Page>>) {
        let previous = previous.map(|p| p.name().to_string()).unwrap_or_else(|| "none".into());
        self.log.borrow_mut().push(format!("strategy:{op}:{}:{previous}", target.name()));
    }
}

impl PageDisplayer for RecordingDisplayer {
    fn show(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition {
        self.record("show", target, previous);
        self.finish()
    }

    fn hide(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition {
        self.record("hide", target, previous);
        self.finish()
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_home_page_scenario() {
    let fx = Fixture::new();
    let container = fx.element_in(fx.doc.body());
    let sibling = fx.element_in(&container);

    let page = fx.page_in(
        "home",
        &container,
        Action::new(|page| {
            page.data().set("ready", "1");
            Ok(())
        }),
        Rc::new(StyleDisplayer::new()),
    );
    let element = page.element().clone();

    // subscribed after construction, still sees the first load
    let seen = Rc::new(RefCell::new(None));
    let s = Rc::clone(&seen);
    page.load.add(move |_, data| *s.borrow_mut() = data.get("ready"));

    assert!(seen.borrow().is_none());
    fx.drain();
    assert_eq!(seen.borrow().as_deref(), Some("1"));

    fx.host.set_current_page(Some(Rc::clone(&page)));
    smol::block_on(page.show()).unwrap();
    assert_eq!(element.style("display").as_deref(), Some("block"));
    assert_eq!(sibling.style("display"), None);
    assert_eq!(container.style("display"), None);

    let detached_when_closed = Rc::new(Cell::new(false));
    let d = Rc::clone(&detached_when_closed);
    page.closed.add(move |page, _| d.set(page.element().parent().is_none()));

    let signal = page.close();
    assert!(detached_when_closed.get());
    smol::block_on(signal);

    assert!(!container.children().iter().any(|c| c.same_node(&element)));
    assert_eq!(page.state(), PageState::Closed);
}

#[test]
fn test_show_swaps_with_current_page() {
    let fx = Fixture::new();
    let first = fx.page("first", Action::new(|_| Ok(())));
    let second = fx.page("second", Action::new(|_| Ok(())));
    fx.drain();

    fx.host.set_current_page(Some(Rc::clone(&first)));
    smol::block_on(first.show()).unwrap();
    smol::block_on(second.show()).unwrap();

    assert_eq!(second.element().style("display").as_deref(), Some("block"));
    assert_eq!(first.element().style("display").as_deref(), Some("none"));
}

#[test]
fn test_hide_restores_given_page() {
    let fx = Fixture::new();
    let list = fx.page("list", Action::new(|_| Ok(())));
    let detail = fx.page("detail", Action::new(|_| Ok(())));
    fx.drain();

    smol::block_on(detail.show()).unwrap();
    smol::block_on(detail.hide(Some(&list))).unwrap();

    assert_eq!(detail.element().style("display").as_deref(), Some("none"));
    assert_eq!(list.element().style("display").as_deref(), Some("block"));
    assert_eq!(detail.state(), PageState::Hidden);
}

// ============================================================================
// LOAD
// ============================================================================

#[test]
fn test_load_fires_once_per_run() {
    let fx = Fixture::new();
    let page = fx.page("feed", Action::new(|_| Ok(())));
    let loads = Rc::new(Cell::new(0));
    let l = Rc::clone(&loads);
    page.load.add(move |_, _| l.set(l.get() + 1));

    fx.drain();
    assert_eq!(loads.get(), 1);

    smol::block_on(page.reload()).unwrap();
    smol::block_on(page.reload()).unwrap();
    assert_eq!(loads.get(), 3);
}

#[test]
fn test_sync_reload_fires_load_at_call_time() {
    let fx = Fixture::new();
    let page = fx.page("feed", Action::new(|_| Ok(())));
    let loads = Rc::new(Cell::new(0));
    let l = Rc::clone(&loads);
    page.load.add(move |_, _| l.set(l.get() + 1));
    fx.drain();
    assert_eq!(loads.get(), 1);

    let pending = page.reload();
    assert_eq!(loads.get(), 2);
    assert_eq!(page.state(), PageState::Loaded);

    smol::block_on(pending).unwrap();
    assert_eq!(loads.get(), 2);
}

#[test]
fn test_first_run_happens_without_awaiting_handle() {
    let fx = Fixture::new();
    let page = fx.page("feed", Action::new(|_| Ok(())));
    let loads = Rc::new(Cell::new(0));
    let l = Rc::clone(&loads);
    page.load.add(move |_, _| l.set(l.get() + 1));

    let handle = page.initial_load();
    assert!(handle.is_some());
    drop(handle);
    fx.drain();

    assert_eq!(loads.get(), 1);
    assert_eq!(page.state(), PageState::Loaded);
}

#[test]
fn test_async_action_delays_load() {
    let fx = Fixture::new();
    let (tx, rx) = smol::channel::unbounded::<()>();
    let page = fx.page(
        "search",
        Action::from_async(move |_| {
            let rx = rx.clone();
            async move {
                rx.recv().await?;
                Ok(())
            }
        }),
    );
    let loads = Rc::new(Cell::new(0));
    let l = Rc::clone(&loads);
    page.load.add(move |_, _| l.set(l.get() + 1));

    fx.drain();
    assert_eq!(page.state(), PageState::Loading);
    assert_eq!(loads.get(), 0);

    tx.try_send(()).unwrap();
    fx.drain();
    assert_eq!(loads.get(), 1);
    assert_eq!(page.state(), PageState::Loaded);

    let reload = page.reload();
    assert_eq!(loads.get(), 1);
    tx.try_send(()).unwrap();
    smol::block_on(fx.ex.run(reload)).unwrap();
    assert_eq!(loads.get(), 2);
}

#[test]
fn test_failed_async_action_skips_load() {
    let fx = Fixture::new();
    let page = fx.page(
        "broken",
        Action::from_async(|_| async { Err(anyhow!("fetch failed")) }),
    );
    let loaded = Rc::new(Cell::new(false));
    let l = Rc::clone(&loaded);
    page.load.add(move |_, _| l.set(true));

    let first = page.initial_load().unwrap();
    let err = smol::block_on(fx.ex.run(first.wait())).unwrap_err();

    assert!(matches!(err, PageError::Action { .. }));
    assert_eq!(format!("{:#}", anyhow::Error::from(err)), "action of page 'broken' failed: fetch failed");
    assert!(!loaded.get());
    assert_eq!(page.state(), PageState::Loading);
}

#[test]
fn test_unbound_action_names_page() {
    let fx = Fixture::new();
    let page = fx.page("settings", Action::unbound());

    let err = smol::block_on(page.reload()).unwrap_err();
    assert!(matches!(err, PageError::ActionType { .. }));
    assert_eq!(err.to_string(), "action of page 'settings' is not a function");

    let first = page.initial_load().unwrap();
    assert!(smol::block_on(fx.ex.run(first.wait())).is_err());
}

// ============================================================================
// SHOW / HIDE ORDERING
// ============================================================================

#[test]
fn test_show_event_order() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let page = fx.page_in(
        "home",
        fx.doc.body(),
        Action::new(|_| Ok(())),
        Rc::new(RecordingDisplayer::new(&log)),
    );
    fx.drain();

    let l = Rc::clone(&log);
    page.showing.add(move |page, _| log_event(&l, page, "showing"));
    let l = Rc::clone(&log);
    page.shown.add(move |page, _| log_event(&l, page, "shown"));

    smol::block_on(page.show()).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["showing:home", "strategy:show:home:none", "shown:home"]
    );
}

#[test]
fn test_shown_waits_for_strategy() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let (tx, rx) = smol::channel::unbounded();
    let displayer = RecordingDisplayer { gate: Some(rx), ..RecordingDisplayer::new(&log) };
    let page = fx.page_in("home", fx.doc.body(), Action::new(|_| Ok(())), Rc::new(displayer));
    fx.drain();

    let shown = Rc::new(Cell::new(false));
    let s = Rc::clone(&shown);
    page.shown.add(move |_, _| s.set(true));

    let pending = page.show();
    assert_eq!(page.state(), PageState::Showing);
    assert_eq!(log.borrow().len(), 1);

    let task = fx.ex.spawn(pending);
    fx.drain();
    assert!(!shown.get());

    tx.try_send(()).unwrap();
    smol::block_on(fx.ex.run(task)).unwrap();
    assert!(shown.get());
    assert_eq!(page.state(), PageState::Shown);
}

#[test]
fn test_reload_during_show_is_not_guarded() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let (tx, rx) = smol::channel::unbounded();
    let displayer = RecordingDisplayer { gate: Some(rx), ..RecordingDisplayer::new(&log) };
    let page = fx.page_in("live", fx.doc.body(), Action::new(|_| Ok(())), Rc::new(displayer));
    fx.drain();

    let l = Rc::clone(&log);
    page.load.add(move |page, _| log_event(&l, page, "load"));
    let l = Rc::clone(&log);
    page.shown.add(move |page, _| log_event(&l, page, "shown"));

    let showing = fx.ex.spawn(page.show());
    fx.drain();
    assert_eq!(page.state(), PageState::Showing);

    // refresh content while the transition is still running
    smol::block_on(page.reload()).unwrap();
    assert_eq!(page.state(), PageState::Loaded);

    tx.try_send(()).unwrap();
    smol::block_on(fx.ex.run(showing)).unwrap();

    assert_eq!(page.state(), PageState::Shown);
    assert_eq!(
        *log.borrow(),
        vec!["strategy:show:live:none", "load:live", "shown:live"]
    );
}

#[test]
fn test_current_page_is_never_its_own_previous() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let displayer: Rc<dyn PageDisplayer> = Rc::new(RecordingDisplayer::new(&log));
    let home = fx.page_in("home", fx.doc.body(), Action::new(|_| Ok(())), Rc::clone(&displayer));
    let about = fx.page_in("about", fx.doc.body(), Action::new(|_| Ok(())), displayer);
    fx.drain();

    fx.host.set_current_page(Some(Rc::clone(&home)));
    smol::block_on(home.show()).unwrap();
    smol::block_on(about.show()).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["strategy:show:home:none", "strategy:show:about:home"]
    );
}

#[test]
fn test_identity_not_name_decides_previous() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let displayer: Rc<dyn PageDisplayer> = Rc::new(RecordingDisplayer::new(&log));
    let old = fx.page_in("home", fx.doc.body(), Action::new(|_| Ok(())), Rc::clone(&displayer));
    let fresh = fx.page_in("home", fx.doc.body(), Action::new(|_| Ok(())), displayer);
    fx.drain();

    fx.host.set_current_page(Some(Rc::clone(&old)));
    smol::block_on(fresh.show()).unwrap();

    assert_eq!(*log.borrow(), vec!["strategy:show:home:home"]);
}

#[test]
fn test_strategy_failure_propagates() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let displayer = RecordingDisplayer { fail: true, ..RecordingDisplayer::new(&log) };
    let page = fx.page_in("home", fx.doc.body(), Action::new(|_| Ok(())), Rc::new(displayer));
    fx.drain();

    let shown = Rc::new(Cell::new(false));
    let s = Rc::clone(&shown);
    page.shown.add(move |_, _| s.set(true));
    let hidden = Rc::new(Cell::new(false));
    let h = Rc::clone(&hidden);
    page.hidden.add(move |_, _| h.set(true));

    let err = smol::block_on(page.show()).unwrap_err();
    assert!(matches!(err, PageError::Transition { phase: TransitionPhase::Show, .. }));
    assert!(!shown.get());
    assert_eq!(page.state(), PageState::Showing);

    let err = smol::block_on(page.hide(None)).unwrap_err();
    assert!(matches!(err, PageError::Transition { phase: TransitionPhase::Hide, .. }));
    assert!(!hidden.get());
}

#[test]
fn test_hide_event_order() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let displayer: Rc<dyn PageDisplayer> = Rc::new(RecordingDisplayer::new(&log));
    let list = fx.page_in("list", fx.doc.body(), Action::new(|_| Ok(())), Rc::clone(&displayer));
    let detail = fx.page_in("detail", fx.doc.body(), Action::new(|_| Ok(())), displayer);
    fx.drain();

    let l = Rc::clone(&log);
    detail.hiding.add(move |page, _| log_event(&l, page, "hiding"));
    let l = Rc::clone(&log);
    detail.hidden.add(move |page, _| log_event(&l, page, "hidden"));

    smol::block_on(detail.hide(Some(&list))).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["hiding:detail", "strategy:hide:detail:list", "hidden:detail"]
    );
}

// ============================================================================
// CLOSE
// ============================================================================

#[test]
fn test_close_fires_once() {
    let fx = Fixture::new();
    let log: Log = Rc::default();
    let page = fx.page("home", Action::new(|_| Ok(())));
    fx.drain();

    let l = Rc::clone(&log);
    page.closing.add(move |page, _| {
        log_event(&l, page, "closing");
        assert!(page.element().is_connected());
    });
    let l = Rc::clone(&log);
    page.closed.add(move |page, _| log_event(&l, page, "closed"));

    smol::block_on(page.close());
    smol::block_on(page.close());

    assert_eq!(*log.borrow(), vec!["closing:home", "closed:home"]);
    assert!(!page.element().is_connected());
}

#[test]
fn test_events_share_page_data() {
    let fx = Fixture::new();
    let page = fx.page("home", Action::new(|_| Ok(())));
    page.showing.add(|_, data| {
        data.set("visits", "1");
    });
    let seen = Rc::new(RefCell::new(None));
    let s = Rc::clone(&seen);
    page.shown.add(move |_, data| *s.borrow_mut() = data.get("visits"));

    fx.drain();
    smol::block_on(page.show()).unwrap();

    assert_eq!(seen.borrow().as_deref(), Some("1"));
    assert_eq!(page.data().get("visits").as_deref(), Some("1"));
}

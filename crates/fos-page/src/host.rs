//! Host contract
//!
//! The application that owns pages. A page only ever asks its host which
//! page is current and hands it errors to report.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Callbacks, Page, SharedError};

/// Error stream a host exposes; fired with `(host, fault)`
pub type ErrorCallbacks = Callbacks<dyn PageMaster, PageFault>;

/// An error raised on behalf of a page
#[derive(Clone)]
pub struct PageFault {
    pub error: SharedError,
    /// Page the error originated from
    pub page: Rc<Page>,
}

impl fmt::Debug for PageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFault")
            .field("error", &format_args!("{:#}", self.error))
            .field("page", &self.page.name())
            .finish()
    }
}

/// Host capabilities consumed by `Page`
pub trait PageMaster {
    /// Page currently on screen, if any
    fn current_page(&self) -> Option<Rc<Page>>;

    /// Sink for errors raised on behalf of pages
    fn error(&self) -> &ErrorCallbacks;
}

/// Minimal in-memory host: a current-page slot and an error stream.
/// Keeping the slot up to date is the caller's job.
#[derive(Default)]
pub struct SimpleHost {
    current: RefCell<Option<Rc<Page>>>,
    error: ErrorCallbacks,
}

impl SimpleHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set_current_page(&self, page: Option<Rc<Page>>) {
        *self.current.borrow_mut() = page;
    }
}

impl PageMaster for SimpleHost {
    fn current_page(&self) -> Option<Rc<Page>> {
        self.current.borrow().clone()
    }

    fn error(&self) -> &ErrorCallbacks {
        &self.error
    }
}

impl fmt::Debug for SimpleHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleHost")
            .field("current", &self.current.borrow().as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

//! fOS Page
//!
//! Page lifecycle for single-page applications running on the fOS DOM.
//!
//! A `Page` owns one element and one navigation action. It runs the action
//! on the next scheduler turn after construction, then lets its host drive
//! it through `show`, `hide`, `reload` and `close`, firing a pair of events
//! around each step. The visual swap itself is left to a `PageDisplayer`.
//!
//! # Example
//! ```rust,ignore
//! use fos_page::{Action, Page, PageParams, SimpleHost, StyleDisplayer};
//!
//! let page = Page::new(PageParams { /* ... */ });
//! page.load.add(|page, data| println!("{} loaded: {:?}", page.name(), data));
//! ```

mod callbacks;
mod data;
mod action;
mod displayer;
mod host;
mod service;
mod page;
mod config;
mod error;

pub use callbacks::{Callbacks, Fired, SubscriptionId};
pub use data::PageData;
pub use action::{Action, ActionOutcome};
pub use displayer::{FadeDisplayer, PageDisplayer, StyleDisplayer, Transition};
pub use host::{ErrorCallbacks, PageFault, PageMaster, SimpleHost};
pub use service::{PageService, Service};
pub use page::{InitialLoad, Page, PageCallbacks, PageParams, PageState};
pub use config::DisplayConfig;
pub use error::{PageError, SharedError, TransitionPhase};

// Re-export for hosts that build page surfaces
pub use fos_dom as dom;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

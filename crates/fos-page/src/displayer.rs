//! Display strategies
//!
//! A `PageDisplayer` performs the visual swap between the page being
//! shown or hidden and the other page involved. Both operations start
//! their work when called and return a future that settles once the
//! swap is complete.

use std::rc::Rc;
use std::time::Duration;

use futures_util::future::{self, FutureExt, LocalBoxFuture};
use smol::Timer;

use crate::{DisplayConfig, Page};

/// Completion of a show or hide
pub type Transition = LocalBoxFuture<'static, anyhow::Result<()>>;

/// Visual transition strategy consumed by `Page`
pub trait PageDisplayer {
    /// Make `target` visible; `previous` is the page it replaces
    fn show(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition;

    /// Hide `target`; `previous` is the page that comes back
    fn hide(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition;
}

/// Default strategy: flips the `display` style of both surfaces at once
#[derive(Debug, Clone, Default)]
pub struct StyleDisplayer {
    config: DisplayConfig,
}

impl StyleDisplayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DisplayConfig) -> Self {
        Self { config }
    }

    fn set_visible(&self, page: &Page, visible: bool) {
        let value = if visible { &self.config.visible } else { &self.config.hidden };
        page.element().set_style(&self.config.property, value);
    }
}

impl PageDisplayer for StyleDisplayer {
    fn show(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition {
        self.set_visible(target, true);
        if let Some(previous) = previous {
            self.set_visible(previous, false);
        }
        future::ready(Ok(())).boxed_local()
    }

    fn hide(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition {
        self.set_visible(target, false);
        if let Some(previous) = previous {
            self.set_visible(previous, true);
        }
        future::ready(Ok(())).boxed_local()
    }
}

/// Cross-fade: the incoming surface becomes visible at zero opacity,
/// and after `duration` it is brought to full opacity while the outgoing
/// one is hidden.
#[derive(Debug, Clone)]
pub struct FadeDisplayer {
    config: DisplayConfig,
    duration: Duration,
}

impl FadeDisplayer {
    pub fn new(duration: Duration) -> Self {
        Self::with_config(DisplayConfig::default(), duration)
    }

    pub fn with_config(config: DisplayConfig, duration: Duration) -> Self {
        Self { config, duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn fade(&self, incoming: Option<Rc<Page>>, outgoing: Option<Rc<Page>>) -> Transition {
        if let Some(page) = &incoming {
            page.element().set_style(&self.config.property, &self.config.visible);
            page.element().set_style("opacity", "0");
        }
        if let Some(page) = &outgoing {
            page.element().set_style("opacity", "0");
        }

        let config = self.config.clone();
        let duration = self.duration;
        async move {
            Timer::after(duration).await;
            if let Some(page) = incoming {
                page.element().set_style("opacity", "1");
            }
            if let Some(page) = outgoing {
                page.element().set_style(&config.property, &config.hidden);
            }
            Ok(())
        }
        .boxed_local()
    }
}

impl PageDisplayer for FadeDisplayer {
    fn show(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition {
        self.fade(Some(Rc::clone(target)), previous.cloned())
    }

    fn hide(&self, target: &Rc<Page>, previous: Option<&Rc<Page>>) -> Transition {
        self.fade(previous.cloned(), Some(Rc::clone(target)))
    }
}

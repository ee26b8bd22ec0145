//! Page-ready composition of the three behaviors.
//!
//! Each behavior is wired independently; one failing to wire is logged and
//! does not stop the others.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::EnhanceConfig;
use crate::nav::NavMenu;
use crate::platform::{Element, Platform};
use crate::result::ResultExt;
use crate::reveal::RevealSet;
use crate::{counter, nav, reveal};

/// Live handles to the wired behaviors.
pub struct Enhancement<E: Element> {
    pub reveal: Option<Rc<RefCell<RevealSet<E>>>>,
    pub counters_started: usize,
    pub nav: Option<Rc<RefCell<NavMenu<E>>>>,
}

/// What was wired, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnhanceReport {
    pub reveal_targets: usize,
    pub counters_started: usize,
    pub nav_wired: bool,
}

impl<E: Element> Enhancement<E> {
    #[must_use]
    pub fn report(&self) -> EnhanceReport {
        EnhanceReport {
            reveal_targets: self.reveal.as_ref().map_or(0, |set| set.borrow().len()),
            counters_started: self.counters_started,
            nav_wired: self.nav.is_some(),
        }
    }
}

/// Wire reveal-on-scroll, counters and the navigation toggle.
pub fn enhance<P: Platform>(platform: &P, config: &EnhanceConfig) -> Enhancement<P::Element> {
    let enhancement = Enhancement {
        reveal: reveal::attach(platform, &config.reveal).into_option_logged(),
        counters_started: counter::attach(platform, &config.counter).or_default_logged(0),
        nav: nav::attach(platform, &config.nav)
            .into_option_logged()
            .flatten(),
    };

    let report = enhancement.report();
    tracing::info!(
        reveal_targets = report.reveal_targets,
        counters = report.counters_started,
        nav = report.nav_wired,
        "page enhanced"
    );
    enhancement
}

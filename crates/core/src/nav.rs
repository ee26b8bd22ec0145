//! Navigation toggle state machine.
//!
//! The toggle control flips the menu open and closed. Clicking a link in the
//! menu, or anywhere outside both the menu and the toggle, forces it closed.
//! Only the toggle path writes the expanded attribute unless
//! `sync_aria_on_close` is set.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::NavConfig;
use crate::platform::{ClickTarget, Element, Platform, Propagation};
use crate::result::{Result, ResultExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Closed,
    Open,
}

impl NavState {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Value written to the expanded attribute for this state.
    #[must_use]
    pub const fn aria_value(self) -> &'static str {
        match self {
            Self::Closed => "false",
            Self::Open => "true",
        }
    }
}

impl std::fmt::Display for NavState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
        }
    }
}

/// A menu panel and the control that toggles it.
#[derive(Debug)]
pub struct NavMenu<E: Element> {
    toggle: E,
    menu: E,
    state: NavState,
    open_class: String,
    expanded_attribute: String,
    sync_aria_on_close: bool,
}

impl<E: Element> NavMenu<E> {
    #[must_use]
    pub fn new(toggle: E, menu: E, config: &NavConfig) -> Self {
        Self {
            toggle,
            menu,
            state: NavState::Closed,
            open_class: config.open_class.clone(),
            expanded_attribute: config.expanded_attribute.clone(),
            sync_aria_on_close: config.sync_aria_on_close,
        }
    }

    /// Build a menu only when both elements are present.
    #[must_use]
    pub fn from_parts(toggle: Option<E>, menu: Option<E>, config: &NavConfig) -> Option<Self> {
        Some(Self::new(toggle?, menu?, config))
    }

    #[must_use]
    pub const fn state(&self) -> NavState {
        self.state
    }

    #[must_use]
    pub const fn toggle_element(&self) -> &E {
        &self.toggle
    }

    #[must_use]
    pub const fn menu_element(&self) -> &E {
        &self.menu
    }

    /// Flip the menu and mirror the new state onto both markers and the
    /// expanded attribute.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if a marker or the attribute cannot be written.
    pub fn toggle(&mut self) -> Result<NavState> {
        self.state = self.state.toggled();
        self.apply_markers()?;
        self.toggle
            .set_attribute(&self.expanded_attribute, self.state.aria_value())?;
        tracing::debug!(state = %self.state, "navigation toggled");
        Ok(self.state)
    }

    /// Force the menu closed, whatever its current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if a marker or the attribute cannot be written.
    pub fn close(&mut self) -> Result<()> {
        self.state = NavState::Closed;
        self.apply_markers()?;
        if self.sync_aria_on_close {
            self.toggle
                .set_attribute(&self.expanded_attribute, NavState::Closed.aria_value())?;
        }
        Ok(())
    }

    /// Handle a click that reached the document. Closes the menu when the
    /// click originated outside both the menu and the toggle.
    ///
    /// Returns whether the outside-click path ran.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if closing fails.
    pub fn on_document_click(&mut self, target: &E) -> Result<bool> {
        if self.menu.contains(target) || self.toggle.contains(target) {
            return Ok(false);
        }
        self.close()?;
        Ok(true)
    }

    fn apply_markers(&self) -> Result<()> {
        for element in [&self.menu, &self.toggle] {
            if self.state.is_open() {
                element.add_class(&self.open_class)?;
            } else {
                element.remove_class(&self.open_class)?;
            }
        }
        Ok(())
    }
}

/// Wire the navigation toggle.
///
/// Returns `None`, wiring nothing, when either the toggle or the menu is
/// missing from the page.
///
/// # Errors
///
/// Returns `Error::Dom` if a selector is rejected or a listener cannot be
/// registered.
pub fn attach<P: Platform>(
    platform: &P,
    config: &NavConfig,
) -> Result<Option<Rc<RefCell<NavMenu<P::Element>>>>> {
    let toggle = platform.query(&config.toggle_selector)?;
    let menu = platform.query(&config.menu_selector)?;
    let Some(nav) = NavMenu::from_parts(toggle, menu, config) else {
        tracing::debug!("navigation toggle or menu missing, skipping");
        return Ok(None);
    };

    let toggle_element = nav.toggle_element().clone();
    let links = nav.menu_element().query_all(&config.link_selector)?;
    let nav = Rc::new(RefCell::new(nav));

    let handler = Rc::clone(&nav);
    platform.listen_click(
        ClickTarget::Element(&toggle_element),
        Box::new(move |_| {
            handler.borrow_mut().toggle().log_err();
            Propagation::Stop
        }),
    )?;

    for link in &links {
        let handler = Rc::clone(&nav);
        platform.listen_click(
            ClickTarget::Element(link),
            Box::new(move |_| {
                handler.borrow_mut().close().log_err();
                Propagation::Continue
            }),
        )?;
    }

    let handler = Rc::clone(&nav);
    platform.listen_click(
        ClickTarget::Document,
        Box::new(move |target| {
            handler.borrow_mut().on_document_click(target).log_err();
            Propagation::Continue
        }),
    )?;

    tracing::debug!(links = links.len(), "navigation wired");
    Ok(Some(nav))
}

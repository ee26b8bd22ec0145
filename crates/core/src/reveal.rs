//! Reveal-on-scroll.
//!
//! Elements are marked visible the first time the observer reports them as
//! intersecting and stay marked for the rest of the page session. The
//! threshold is handed to the observer; it decides when a batch is
//! delivered, not which entries in it count.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RevealConfig;
use crate::error::Error;
use crate::platform::{Element, Platform};
use crate::result::{Result, ResultExt};

/// Minimum visible fraction of an element, within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// # Errors
    ///
    /// Returns `Error::InvalidThreshold` if `value` is not finite or is
    /// outside `0.0..=1.0`.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidThreshold { value })
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(0.15)
    }
}

/// One intersection change reported by the observer.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<E> {
    pub target: E,
    pub is_intersecting: bool,
    /// Visible fraction of the target, `0.0..=1.0`
    pub ratio: f64,
}

#[derive(Debug)]
struct Tracked<E> {
    element: E,
    revealed: bool,
}

/// The set of revealable elements and whether each has been seen.
#[derive(Debug)]
pub struct RevealSet<E: Element> {
    tracked: Vec<Tracked<E>>,
    threshold: Threshold,
    visible_class: String,
}

impl<E: Element> RevealSet<E> {
    #[must_use]
    pub fn new(elements: Vec<E>, threshold: Threshold, visible_class: impl Into<String>) -> Self {
        let tracked = elements
            .into_iter()
            .map(|element| Tracked {
                element,
                revealed: false,
            })
            .collect();
        Self {
            tracked,
            threshold,
            visible_class: visible_class.into(),
        }
    }

    /// Apply a batch of intersection changes.
    ///
    /// Every intersecting entry reveals its element, whatever its ratio.
    /// Returns how many elements were newly revealed. Non-intersecting
    /// entries, elements outside the set and elements already revealed are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns the first class-list failure; entries before it stay applied.
    pub fn apply(&mut self, entries: &[Intersection<E>]) -> Result<usize> {
        let mut newly = 0_usize;
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            let Some(tracked) = self.tracked.iter_mut().find(|t| t.element == entry.target) else {
                continue;
            };
            if tracked.revealed {
                continue;
            }
            tracked.element.add_class(&self.visible_class)?;
            tracked.revealed = true;
            newly = newly.saturating_add(1);
        }
        Ok(newly)
    }

    /// Threshold the observer is asked to report at.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[must_use]
    pub fn is_revealed(&self, element: &E) -> bool {
        self.tracked
            .iter()
            .any(|t| t.revealed && &t.element == element)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.tracked.iter().filter(|t| t.revealed).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    fn elements(&self) -> Vec<E> {
        self.tracked.iter().map(|t| t.element.clone()).collect()
    }
}

/// Observe every revealable element on the page.
///
/// Returns the shared reveal set so callers can inspect progress.
///
/// # Errors
///
/// Returns an error if the config threshold is invalid, the selector is
/// rejected, or the observer cannot be created.
pub fn attach<P: Platform>(
    platform: &P,
    config: &RevealConfig,
) -> Result<Rc<RefCell<RevealSet<P::Element>>>> {
    let threshold = Threshold::new(config.threshold)?;
    let elements = platform.query_all(&config.selector)?;
    let set = Rc::new(RefCell::new(RevealSet::new(
        elements,
        threshold,
        config.visible_class.clone(),
    )));

    let targets = set.borrow().elements();
    tracing::debug!(count = targets.len(), selector = %config.selector, "observing reveal targets");

    let handler_set = Rc::clone(&set);
    platform.observe_intersections(
        &targets,
        threshold,
        Box::new(move |entries| {
            let newly = handler_set.borrow_mut().apply(&entries).or_default_logged(0);
            if newly > 0 {
                tracing::trace!(newly, "revealed elements");
            }
        }),
    )?;

    Ok(set)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::fake::FakePlatform;

    fn entry<E>(target: &E, ratio: f64) -> Intersection<E>
    where
        E: Clone,
    {
        Intersection {
            target: target.clone(),
            is_intersecting: ratio > 0.0,
            ratio,
        }
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert!(Threshold::new(-0.01).is_err());
        assert!(Threshold::new(1.01).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
    }

    #[test]
    fn test_threshold_defaults_to_fifteen_percent() {
        assert!((Threshold::default().value() - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn given_entry_above_threshold_when_applied_then_element_revealed() -> Result<()> {
        let page = FakePlatform::new();
        let el = page.create("div");
        let mut set = RevealSet::new(vec![el.clone()], Threshold::default(), "visible");

        assert_eq!(set.apply(&[entry(&el, 0.3)])?, 1);
        assert!(set.is_revealed(&el));
        assert!(el.has_class("visible"));
        Ok(())
    }

    #[test]
    fn given_revealed_element_when_it_leaves_then_marker_stays() -> Result<()> {
        let page = FakePlatform::new();
        let el = page.create("div");
        let mut set = RevealSet::new(vec![el.clone()], Threshold::default(), "visible");

        set.apply(&[entry(&el, 0.5)])?;
        assert_eq!(set.apply(&[entry(&el, 0.0)])?, 0);
        assert!(el.has_class("visible"));
        assert_eq!(set.revealed_count(), 1);
        Ok(())
    }

    #[test]
    fn given_revealed_element_when_seen_again_then_not_counted_twice() -> Result<()> {
        let page = FakePlatform::new();
        let el = page.create("div");
        let mut set = RevealSet::new(vec![el.clone()], Threshold::default(), "visible");

        set.apply(&[entry(&el, 0.5)])?;
        assert_eq!(set.apply(&[entry(&el, 0.9)])?, 0);
        assert_eq!(el.class_writes(), 1);
        Ok(())
    }

    #[test]
    fn given_intersecting_entry_below_threshold_when_applied_then_revealed() -> Result<()> {
        let page = FakePlatform::new();
        let tall = page.create("section");
        let mut set = RevealSet::new(vec![tall.clone()], Threshold::default(), "visible");

        let seen = Intersection {
            target: tall.clone(),
            is_intersecting: true,
            ratio: 0.1,
        };
        assert_eq!(set.apply(&[seen])?, 1);
        assert!(tall.has_class("visible"));
        Ok(())
    }

    #[test]
    fn given_non_intersecting_entry_when_applied_then_not_revealed() -> Result<()> {
        let page = FakePlatform::new();
        let el = page.create("div");
        let mut set = RevealSet::new(vec![el.clone()], Threshold::default(), "visible");

        let gone = Intersection {
            target: el.clone(),
            is_intersecting: false,
            ratio: 0.0,
        };
        assert_eq!(set.apply(&[gone])?, 0);
        assert!(!el.has_class("visible"));
        Ok(())
    }

    #[test]
    fn given_untracked_target_when_applied_then_ignored() -> Result<()> {
        let page = FakePlatform::new();
        let tracked = page.create("div");
        let stranger = page.create("div");
        let mut set = RevealSet::new(vec![tracked], Threshold::default(), "visible");

        assert_eq!(set.apply(&[entry(&stranger, 1.0)])?, 0);
        assert!(!stranger.has_class("visible"));
        Ok(())
    }
}

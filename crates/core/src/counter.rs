//! Counter animation.
//!
//! A counter steps its displayed integer from 0 toward a target by one per
//! tick. The interval is derived from the total duration so that small
//! targets finish in roughly that time; large targets simply run at the
//! shortest interval.

use std::ops::ControlFlow;

use crate::config::CounterConfig;
use crate::platform::{Element, Platform};
use crate::result::Result;

/// Total animation time used by the page wiring.
pub const DEFAULT_DURATION_MS: u32 = 1000;

/// Interval used when the computed one is zero.
pub const FALLBACK_STEP_MS: u32 = 20;

/// Parse a counter target the way the page markup is read.
///
/// Leading whitespace and a single sign are accepted, then the longest run
/// of decimal digits; anything after it is ignored (`"12px"` is 12).
/// Missing or non-numeric input yields 0. Values beyond `i64` saturate.
#[must_use]
pub fn parse_target(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut seen_digit = false;
    let mut value: i64 = 0;
    for digit in digits.chars().map_while(|c| c.to_digit(10)) {
        seen_digit = true;
        let digit = i64::from(digit);
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    if seen_digit { value } else { 0 }
}

/// Division rounding toward negative infinity.
fn floor_div(numerator: i64, denominator: i64) -> Option<i64> {
    let quotient = numerator.checked_div(denominator)?;
    let remainder = numerator.checked_rem(denominator)?;
    if remainder != 0 && ((remainder < 0) != (denominator < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Milliseconds between ticks: `abs(floor(duration / end))`, or
/// [`FALLBACK_STEP_MS`] when that is zero or `end` is zero.
///
/// ```
/// use pagefx_core::counter::step_interval;
///
/// assert_eq!(step_interval(5, 1000), 200);
/// assert_eq!(step_interval(-3, 1000), 334);
/// assert_eq!(step_interval(5000, 1000), 20);
/// assert_eq!(step_interval(0, 1000), 20);
/// ```
#[must_use]
pub fn step_interval(end: i64, duration_ms: u32) -> u32 {
    step_interval_or(end, duration_ms, FALLBACK_STEP_MS)
}

/// [`step_interval`] with a caller-chosen fallback.
#[must_use]
pub fn step_interval_or(end: i64, duration_ms: u32, fallback_ms: u32) -> u32 {
    floor_div(i64::from(duration_ms), end)
        .map(i64::unsigned_abs)
        .and_then(|step| u32::try_from(step).ok())
        .filter(|step| *step != 0)
        .unwrap_or(fallback_ms)
}

/// One displayed frame of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub value: i64,
    /// Set on the frame that reached the target; no tick follows it
    pub finished: bool,
}

/// State of a single counter animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterAnimation {
    target: i64,
    current: i64,
    step: i64,
    interval_ms: u32,
    finished: bool,
}

impl CounterAnimation {
    #[must_use]
    pub fn new(target: i64, duration_ms: u32) -> Self {
        Self::with_fallback(target, duration_ms, FALLBACK_STEP_MS)
    }

    #[must_use]
    pub fn with_fallback(target: i64, duration_ms: u32, fallback_ms: u32) -> Self {
        Self {
            target,
            current: 0,
            step: target.signum(),
            interval_ms: step_interval_or(target, duration_ms, fallback_ms),
            finished: false,
        }
    }

    #[must_use]
    pub const fn target(&self) -> i64 {
        self.target
    }

    /// Value currently on display; 0 before the first tick.
    #[must_use]
    pub const fn current(&self) -> i64 {
        self.current
    }

    #[must_use]
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one step. Returns `None` once the target has been shown.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.finished {
            return None;
        }
        self.current = self.current.saturating_add(self.step);
        self.finished = self.current == self.target;
        Some(Tick {
            value: self.current,
            finished: self.finished,
        })
    }
}

impl Iterator for CounterAnimation {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        self.tick()
    }
}

/// Start animating `element` toward `target` on its own interval.
///
/// The element shows 0 immediately; each tick writes the next value and the
/// tick that writes the target releases the interval.
pub fn start<P: Platform>(
    platform: &P,
    element: P::Element,
    target: i64,
    config: &CounterConfig,
) {
    let mut animation =
        CounterAnimation::with_fallback(target, config.duration_ms, config.fallback_step_ms);
    element.set_text(&animation.current().to_string());

    let stop_when_detached = config.stop_when_detached;
    let interval_ms = animation.interval_ms();
    tracing::trace!(goal = target, interval_ms, "starting counter");

    platform.set_interval(
        interval_ms,
        Box::new(move || {
            if stop_when_detached && !element.is_connected() {
                tracing::debug!(goal = target, "counter element detached, releasing timer");
                return ControlFlow::Break(());
            }
            match animation.tick() {
                Some(tick) => {
                    element.set_text(&tick.value.to_string());
                    if tick.finished {
                        ControlFlow::Break(())
                    } else {
                        ControlFlow::Continue(())
                    }
                }
                None => ControlFlow::Break(()),
            }
        }),
    );
}

/// Start a counter for every element carrying the target attribute.
///
/// Returns how many counters were started.
///
/// # Errors
///
/// Returns `Error::Dom` if the selector is rejected.
pub fn attach<P: Platform>(platform: &P, config: &CounterConfig) -> Result<usize> {
    let elements = platform.query_all(&config.selector)?;
    let started = elements.len();
    for element in elements {
        let target = parse_target(element.attribute(&config.attribute).as_deref());
        start(platform, element, target, config);
    }
    tracing::debug!(started, selector = %config.selector, "counters started");
    Ok(started)
}

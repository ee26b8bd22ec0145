//! Platform-independent page enhancement behaviors.
//!
//! Three independent behaviors attach once the page is ready:
//! - `reveal`: marks elements visible the first time they scroll into view
//! - `counter`: steps numeric counters from 0 to their target
//! - `nav`: open/closed state machine for a mobile navigation menu
//!
//! The behaviors talk to the page only through the [`platform::Platform`]
//! and [`platform::Element`] traits. `pagefx-web` implements them with
//! `web-sys`; `fake::FakePlatform` (feature `fake`) implements them in memory
//! for tests.

#![forbid(unsafe_code)]

pub mod config;
pub mod counter;
pub mod enhance;
pub mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod nav;
pub mod platform;
pub mod result;
pub mod reveal;


pub use config::EnhanceConfig;
pub use enhance::{EnhanceReport, Enhancement, enhance};
pub use error::Error;
pub use result::{Result, ResultExt};

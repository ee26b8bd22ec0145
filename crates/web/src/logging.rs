//! Console logging for `tracing` events.
//!
//! A minimal `tracing-subscriber` layer that formats each event on one line
//! and hands it to the browser console method matching its level.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Message and `key=value` fields collected from one event.
#[derive(Debug, Default)]
struct ConsoleLine {
    message: String,
    fields: String,
}

impl Visit for ConsoleLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

fn format_line(level: Level, target: &str, line: &ConsoleLine) -> String {
    format!("[pagefx] {level} {target}: {}{}", line.message, line.fields)
}

/// Layer forwarding events to `console.*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = ConsoleLine::default();
        event.record(&mut line);

        let metadata = event.metadata();
        let level = *metadata.level();
        let text = JsValue::from_str(&format_line(level, metadata.target(), &line));
        match level {
            Level::ERROR => console::error_1(&text),
            Level::WARN => console::warn_1(&text),
            Level::INFO => console::info_1(&text),
            _ => console::debug_1(&text),
        }
    }
}

/// Install the console subscriber. Later calls are ignored.
pub fn init(level: Level) {
    let installed = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(ConsoleLayer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("console subscriber already installed");
    }
}

//! Console Logger
//!
//! `log` backend for the browser console. Records are printed by
//! `console_log`; the most recent lines are also kept in a bounded buffer so
//! they can be dumped from devtools after a failure.

use std::collections::VecDeque;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

const RECENT_CAPACITY: usize = 200;

/// Fixed-size ring of formatted log lines
#[derive(Debug)]
pub struct RecentLines {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RecentLines {
    pub const fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

struct ConsoleLogger {
    recent: Mutex<RecentLines>,
}

static LOGGER: ConsoleLogger = ConsoleLogger {
    recent: Mutex::new(RecentLines::new(RECENT_CAPACITY)),
};

fn format_line(record: &Record) -> String {
    format!("[{}] {}", record.target(), record.args())
}

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        console_log::log(record);
        if let Ok(mut recent) = self.recent.lock() {
            recent.push(format_line(record));
        }
    }

    fn flush(&self) {}
}

/// Install the console logger; a second call is a no-op
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Lines logged most recently, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER
        .recent
        .lock()
        .map(|recent| recent.snapshot())
        .unwrap_or_default()
}

/// Devtools hook: the recent log lines as one string
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn board_log_dump() -> String {
    recent_lines().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_drops_oldest() {
        let mut ring = RecentLines::new(2);
        ring.push("a".into());
        ring.push("b".into());
        ring.push("c".into());
        assert_eq!(ring.snapshot(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_line_carries_target() {
        let line = format_line(
            &Record::builder()
                .target("board")
                .args(format_args!("loaded {} tasks", 3))
                .build(),
        );
        assert_eq!(line, "[board] loaded 3 tasks");
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut ring = RecentLines::new(0);
        ring.push("a".into());
        assert!(ring.snapshot().is_empty());
    }
}

//! Fixed-capacity console scrollback.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone)]
pub struct ConsoleLine {
    pub direction: Direction,
    pub text: String,
}

/// Ring buffer of sent/received lines. Pushing past capacity drops the
/// oldest entry so a long session cannot grow without bound.
#[derive(Debug)]
pub struct ConsoleLog {
    lines: VecDeque<ConsoleLine>,
    capacity: usize,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(256)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, direction: Direction, text: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(ConsoleLine {
            direction,
            text: text.into(),
        });
    }

    pub fn sent(&mut self, text: impl Into<String>) {
        self.push(Direction::Sent, text);
    }

    pub fn received(&mut self, text: impl Into<String>) {
        self.push(Direction::Received, text);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_lines_when_full() {
        let mut log = ConsoleLog::new(3);
        for i in 0..5 {
            log.received(format!("line {}", i));
        }
        assert_eq!(log.len(), 3);
        let texts: Vec<&str> = log.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn records_direction() {
        let mut log = ConsoleLog::new(8);
        log.sent("M;");
        log.received("3.14");
        let dirs: Vec<Direction> = log.iter().map(|l| l.direction).collect();
        assert_eq!(dirs, vec![Direction::Sent, Direction::Received]);
    }
}

use std::collections::VecDeque;

use super::Wrapper;
use super::WrapperState;
use crate::action::Decision;
use crate::config::HistoryConfig;
use crate::registry::WrapperKind;

/// Requeries empty or recently-seen outputs.
///
/// Keeps the last `k` allowed outputs (whitespace-stripped) in a FIFO buffer.
/// An output that is empty after stripping, or already in the buffer, yields
/// REQUERY; anything else is recorded and allowed as the original text.
#[derive(Debug, Clone)]
pub struct HistoryWrapper {
    k: usize,
    buffer: VecDeque<String>,
}

impl HistoryWrapper {
    pub fn new(config: &HistoryConfig) -> Self {
        let k = config.depth();
        Self {
            k,
            buffer: VecDeque::with_capacity(k),
        }
    }

    pub fn buffer(&self) -> impl Iterator<Item = &str> {
        self.buffer.iter().map(String::as_str)
    }
}

impl Wrapper for HistoryWrapper {
    fn kind(&self) -> WrapperKind {
        WrapperKind::History
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn step(&mut self, _prompt: &str, model_output: &str, _call_index: u32) -> Decision {
        let stripped = model_output.trim();
        if stripped.is_empty() || self.buffer.iter().any(|seen| seen == stripped) {
            return Decision::requery();
        }
        self.buffer.push_back(stripped.to_string());
        while self.buffer.len() > self.k {
            self.buffer.pop_front();
        }
        Decision::allow(model_output)
    }

    fn state(&self) -> WrapperState {
        WrapperState::History {
            k: self.k,
            buffer: self.buffer.iter().cloned().collect(),
        }
    }
}

// src/model/window.rs

use std::collections::VecDeque;

/// A fixed-capacity rolling window with O(1) eviction from the front.
/// Used for the forecaster's passenger-count observations and the tuner's
/// penalty histories, which only ever care about the most recent entries.
#[derive(Debug, Clone)]
pub struct BoundedWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, evicting the oldest entry once the window is full.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// The most recent `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.buffer.len().saturating_sub(n);
        self.buffer.iter().skip(skip)
    }

    /// The `n` entries preceding the most recent `n`, oldest first.
    /// Empty when the window does not reach back that far.
    pub fn tail_before(&self, n: usize) -> impl Iterator<Item = &T> {
        let len = self.buffer.len();
        let end = len.saturating_sub(n);
        let start = end.saturating_sub(n);
        self.buffer.iter().skip(start).take(end - start)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

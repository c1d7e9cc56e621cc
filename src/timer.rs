use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// A pending task in the queue. Ordered by due time, ties broken by
/// scheduling order so equal deadlines fire first-in first-out.
#[derive(Debug)]
struct Entry<T> {
    due_ms: u64,
    seq: u64,
    every_ms: Option<u64>,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

/// Virtual-clock timer queue standing in for `setTimeout`/`setInterval`.
///
/// Time only moves when the owner calls [`TimerQueue::pop_due`] or
/// [`TimerQueue::settle`], so every component driven by it can be tested
/// without sleeping. While a task is being popped the clock sits at that
/// task's due time, which means follow-up work scheduled from the task
/// handler is measured from when it was *due*, not from when the tick
/// happened to arrive.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: u64,
    seq: u64,
    heap: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            seq: 0,
            heap: BinaryHeap::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Run `task` once, `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) {
        self.push(self.now_ms + delay.as_millis() as u64, None, task);
    }

    /// Run `task` every `interval` until the queue is dropped.
    pub fn schedule_every(&mut self, interval: Duration, task: T) {
        // a zero interval would re-arm at the same instant forever
        let every = (interval.as_millis() as u64).max(1);
        self.push(self.now_ms + every, Some(every), task);
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.due_ms)
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock
    /// to its due time. Repeating tasks are re-armed before returning.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        if self.next_due()? > until_ms {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        if let Some(every) = entry.every_ms {
            self.push(entry.due_ms + every, Some(every), entry.task.clone());
        }
        Some(entry.task)
    }

    /// Move the clock forward to `now_ms` once all due work has run.
    pub fn settle(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn push(&mut self, due_ms: u64, every_ms: Option<u64>, task: T) {
        self.seq += 1;
        self.heap.push(Reverse(Entry {
            due_ms,
            seq: self.seq,
            every_ms,
            task,
        }));
    }
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

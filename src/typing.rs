use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::surface::TextDisplay;

pub const CARET: char = '|';

/// Delays between animation steps, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingTimings {
    pub start_ms: u64,
    pub type_ms: u64,
    pub delete_ms: u64,
    /// hold on a completed word before deleting it
    pub pause_ms: u64,
    /// gap after a word is fully deleted
    pub next_word_ms: u64,
}

impl Default for TypingTimings {
    fn default() -> Self {
        Self {
            start_ms: 1000,
            type_ms: 150,
            delete_ms: 100,
            pause_ms: 800,
            next_word_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TypingPhase {
    Typing,
    Deleting,
    Stopped,
}

/// Types and deletes each word in turn, one character per step, and halts
/// for good once the last word in the list has been typed out.
#[derive(Debug, Clone)]
pub struct TypingAnimation {
    words: Vec<String>,
    word_index: usize,
    char_index: usize,
    phase: TypingPhase,
    timings: TypingTimings,
}

impl TypingAnimation {
    pub fn new(words: Vec<String>, timings: TypingTimings) -> Option<Self> {
        if words.is_empty() {
            return None;
        }
        Some(Self {
            words,
            word_index: 0,
            char_index: 0,
            phase: TypingPhase::Typing,
            timings,
        })
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == TypingPhase::Stopped
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn current_word(&self) -> &str {
        &self.words[self.word_index]
    }

    pub fn terminal_word(&self) -> &str {
        // non-empty by construction
        &self.words[self.words.len() - 1]
    }

    /// Arm the animation. Returns the delay before the first step, or
    /// `None` when reduced motion is requested, in which case the terminal
    /// word is shown straight away and no step will ever run.
    pub fn start<D: TextDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        reduced_motion: bool,
    ) -> Option<Duration> {
        if reduced_motion {
            self.word_index = self.words.len() - 1;
            self.char_index = self.word_len();
            self.phase = TypingPhase::Stopped;
            display.set_text(self.terminal_word());
            debug!(word = self.terminal_word(), "reduced motion, skipping typing animation");
            return None;
        }
        Some(Duration::from_millis(self.timings.start_ms))
    }

    /// Advance one step and return the delay until the next one.
    /// `None` means the animation has stopped and must not be rescheduled.
    pub fn step<D: TextDisplay + ?Sized>(&mut self, display: &mut D) -> Option<Duration> {
        let word_len = self.word_len();
        let delay = match self.phase {
            TypingPhase::Stopped => return None,
            TypingPhase::Typing => {
                self.char_index = (self.char_index + 1).min(word_len);
                if self.char_index < word_len {
                    self.show_with_caret(display);
                    self.timings.type_ms
                } else if self.is_terminal() {
                    self.phase = TypingPhase::Stopped;
                    display.set_text(self.current_word());
                    debug!(word = self.current_word(), "typing animation settled");
                    return None;
                } else {
                    self.show_with_caret(display);
                    self.phase = TypingPhase::Deleting;
                    self.timings.pause_ms
                }
            }
            TypingPhase::Deleting => {
                self.char_index = self.char_index.saturating_sub(1);
                self.show_with_caret(display);
                if self.char_index == 0 {
                    self.word_index = (self.word_index + 1) % self.words.len();
                    self.phase = TypingPhase::Typing;
                    self.timings.next_word_ms
                } else {
                    self.timings.delete_ms
                }
            }
        };
        Some(Duration::from_millis(delay))
    }

    fn is_terminal(&self) -> bool {
        self.word_index == self.words.len() - 1
    }

    fn word_len(&self) -> usize {
        self.current_word().chars().count()
    }

    fn show_with_caret<D: TextDisplay + ?Sized>(&self, display: &mut D) {
        let mut text: String = self.current_word().chars().take(self.char_index).collect();
        text.push(CARET);
        display.set_text(&text);
    }
}

//! Small scroll- and visibility-driven effects. Each one reacts to a single
//! trigger and applies an idempotent update.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PARALLAX_SPEED: f32 = 0.5;
pub const SCROLL_TOP_AFTER_PX: u32 = 300;
pub const COUNTER_STEP: Duration = Duration::from_millis(20);
const COUNTER_STEPS: f64 = 100.0;

/// Hero translation for a given scroll offset.
pub fn parallax_offset(scroll: u32) -> u32 {
    (scroll as f32 * PARALLAX_SPEED) as u32
}

/// Fade-in-and-rise state of a section marked for reveal-on-scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    pub opacity: f32,
    pub translate_y: u32,
    pub animated: bool,
}

impl Reveal {
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            translate_y: 30,
            animated: false,
        }
    }

    pub fn shown() -> Self {
        Self {
            opacity: 1.0,
            translate_y: 0,
            animated: false,
        }
    }

    pub fn reveal(&mut self) {
        self.opacity = 1.0;
        self.translate_y = 0;
        self.animated = true;
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollToTop {
    visible: bool,
}

impl ScrollToTop {
    pub fn on_scroll(&mut self, offset: u32) {
        self.visible = offset > SCROLL_TOP_AFTER_PX;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub alt: String,
    pub data_src: String,
}

/// Image whose real source is only swapped in once it scrolls into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyImage {
    pub alt: String,
    data_src: String,
    src: Option<String>,
}

impl LazyImage {
    pub fn new(content: &ImageContent) -> Self {
        Self {
            alt: content.alt.clone(),
            data_src: content.data_src.clone(),
            src: None,
        }
    }

    pub fn is_lazy(&self) -> bool {
        self.src.is_none()
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn load(&mut self) {
        if self.src.is_none() {
            self.src = Some(self.data_src.clone());
        }
    }
}

/// Count-up animation for a stat such as `500+` or `98%`.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    target: u64,
    suffix: &'static str,
    increment: f64,
    current: f64,
    text: String,
    done: bool,
}

impl Counter {
    /// `None` when the label holds no digits to count towards.
    pub fn parse(label: &str) -> Option<Self> {
        let digits: String = label.chars().filter(char::is_ascii_digit).collect();
        let target = digits.parse::<u64>().ok()?;
        let suffix = if label.contains('+') {
            "+"
        } else if label.contains('%') {
            "%"
        } else {
            ""
        };
        Some(Self {
            target,
            suffix,
            increment: target as f64 / COUNTER_STEPS,
            current: 0.0,
            text: label.to_string(),
            done: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// One animation frame. Returns true while more frames are needed.
    pub fn step(&mut self) -> bool {
        if self.done {
            return false;
        }
        if self.current < self.target as f64 {
            self.current = (self.current + self.increment).min(self.target as f64);
            self.text = format!("{}{}", self.current.ceil() as u64, self.suffix);
            true
        } else {
            self.text = format!("{}{}", self.target, self.suffix);
            self.done = true;
            false
        }
    }
}

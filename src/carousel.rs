use std::time::Duration;
use tracing::trace;

use crate::surface::SlideDeck;

pub const AUTO_ADVANCE: Duration = Duration::from_millis(5000);

/// Shows exactly one slide of a deck at a time.
///
/// Auto-advance is driven from outside by calling [`Carousel::auto_advance`]
/// on a fixed interval; manual navigation does not reset that interval.
#[derive(Debug, Clone)]
pub struct Carousel<D: SlideDeck> {
    deck: D,
    current: usize,
}

impl<D: SlideDeck> Carousel<D> {
    /// Build a carousel showing slide 0, or `None` for an empty deck.
    pub fn new(deck: D) -> Option<Self> {
        if deck.is_empty() {
            return None;
        }
        let mut carousel = Self { deck, current: 0 };
        carousel.go_to_slide(0);
        Some(carousel)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn deck(&self) -> &D {
        &self.deck
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Show slide `index`. Anything below zero lands on the last slide and
    /// anything past the end lands on the first.
    pub fn go_to_slide(&mut self, index: isize) -> usize {
        let len = self.deck.len();
        let index = if index < 0 {
            len - 1
        } else if index as usize >= len {
            0
        } else {
            index as usize
        };

        for i in 0..len {
            self.deck.set_item_visible(i, i == index);
            self.deck.set_indicator_active(i, i == index);
        }
        self.current = index;
        trace!(slide = index, "carousel moved");
        index
    }

    pub fn next(&mut self) -> usize {
        self.go_to_slide(self.current as isize + 1)
    }

    pub fn prev(&mut self) -> usize {
        self.go_to_slide(self.current as isize - 1)
    }

    pub fn auto_advance(&mut self) -> usize {
        self.next()
    }
}

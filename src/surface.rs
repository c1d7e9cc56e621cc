//! Abstract display surfaces the behavior components write to.
//!
//! Components never touch the terminal directly. The page owns concrete
//! surfaces and the ui layer reads them back when drawing.

/// Something that shows a single line of text.
pub trait TextDisplay {
    fn set_text(&mut self, text: &str);
}

impl TextDisplay for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// An ordered set of items, each with a matching indicator control.
pub trait SlideDeck {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_item_visible(&mut self, index: usize, visible: bool);

    fn set_indicator_active(&mut self, index: usize, active: bool);
}

/// In-memory slide deck: the items plus per-item visibility and indicator
/// flags, all hidden until something shows them.
#[derive(Debug, Clone)]
pub struct Deck<T> {
    items: Vec<T>,
    visible: Vec<bool>,
    active: Vec<bool>,
}

impl<T> Deck<T> {
    pub fn new(items: Vec<T>) -> Self {
        let n = items.len();
        Self {
            items,
            visible: vec![false; n],
            active: vec![false; n],
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        flagged(&self.visible)
    }

    pub fn active_indices(&self) -> Vec<usize> {
        flagged(&self.active)
    }

    /// The single visible item, if exactly one is shown.
    pub fn shown(&self) -> Option<&T> {
        match self.visible_indices().as_slice() {
            [i] => self.items.get(*i),
            _ => None,
        }
    }
}

fn flagged(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, on)| on.then_some(i))
        .collect()
}

impl<T> SlideDeck for Deck<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn set_item_visible(&mut self, index: usize, visible: bool) {
        if let Some(v) = self.visible.get_mut(index) {
            *v = visible;
        }
    }

    fn set_indicator_active(&mut self, index: usize, active: bool) {
        if let Some(a) = self.active.get_mut(index) {
            *a = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_display_replaces_text() {
        let mut s = String::from("old");
        s.set_text("new|");
        assert_eq!(s, "new|");
    }

    #[test]
    fn deck_starts_hidden() {
        let deck = Deck::new(vec!["a", "b"]);
        assert_eq!(deck.len(), 2);
        assert!(deck.visible_indices().is_empty());
        assert!(deck.active_indices().is_empty());
        assert_eq!(deck.shown(), None);
    }

    #[test]
    fn deck_ignores_out_of_range_updates() {
        let mut deck = Deck::new(vec!["a"]);
        deck.set_item_visible(5, true);
        deck.set_indicator_active(5, true);
        assert!(deck.visible_indices().is_empty());

        deck.set_item_visible(0, true);
        assert_eq!(deck.shown(), Some(&"a"));
    }
}

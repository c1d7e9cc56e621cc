use std::time::Duration;

pub const FADE_AFTER_LOAD: Duration = Duration::from_millis(1000);
pub const REMOVE_AFTER_FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum LoaderState {
    #[default]
    Shown,
    Fading,
    Removed,
}

/// Full-screen "Loading..." overlay shown until a moment after page load.
#[derive(Debug, Clone, Default)]
pub struct PageLoader {
    state: LoaderState,
    load_seen: bool,
}

impl PageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn is_present(&self) -> bool {
        self.state != LoaderState::Removed
    }

    pub fn opacity(&self) -> f32 {
        match self.state {
            LoaderState::Shown => 1.0,
            LoaderState::Fading | LoaderState::Removed => 0.0,
        }
    }

    /// Page finished loading. Returns the delay before the fade starts;
    /// repeated load signals are ignored.
    pub fn on_load(&mut self) -> Option<Duration> {
        if self.load_seen || self.state != LoaderState::Shown {
            return None;
        }
        self.load_seen = true;
        Some(FADE_AFTER_LOAD)
    }

    /// Start fading. Returns the delay before the overlay is removed.
    pub fn fade(&mut self) -> Option<Duration> {
        if self.state != LoaderState::Shown {
            return None;
        }
        self.state = LoaderState::Fading;
        Some(REMOVE_AFTER_FADE)
    }

    pub fn remove(&mut self) {
        self.state = LoaderState::Removed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle() {
        let mut l = PageLoader::new();
        assert!(l.is_present());
        assert_eq!(l.opacity(), 1.0);

        assert_eq!(l.on_load(), Some(FADE_AFTER_LOAD));
        assert_eq!(l.on_load(), None);

        assert_eq!(l.fade(), Some(REMOVE_AFTER_FADE));
        assert_eq!(l.state(), LoaderState::Fading);
        assert_eq!(l.opacity(), 0.0);
        assert!(l.is_present());

        l.remove();
        assert!(!l.is_present());
        assert_eq!(l.fade(), None);
    }
}

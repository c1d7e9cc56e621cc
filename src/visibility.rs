//! Viewport intersection tracking, the terminal counterpart of an
//! intersection observer. All measurements are in page pixels.

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: u32,
    pub height: u32,
}

/// A vertical span of the page occupied by some element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub top: u32,
    pub height: u32,
}

impl Region {
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

impl Viewport {
    /// Share of `region` inside the viewport, after pulling the viewport's
    /// bottom edge up by `bottom_margin`.
    pub fn intersection_ratio(&self, region: Region, bottom_margin: u32) -> f32 {
        let root_top = self.offset;
        let root_bottom = (self.offset + self.height).saturating_sub(bottom_margin);
        if root_bottom <= root_top {
            return 0.0;
        }

        if region.height == 0 {
            let inside = region.top >= root_top && region.top < root_bottom;
            return if inside { 1.0 } else { 0.0 };
        }

        let top = region.top.max(root_top);
        let bottom = region.bottom().min(root_bottom);
        if bottom <= top {
            return 0.0;
        }
        (bottom - top) as f32 / region.height as f32
    }
}

#[derive(Debug, Clone)]
struct Target<K> {
    key: K,
    region: Region,
    intersecting: bool,
}

/// Watches a set of regions and reports the ones that *enter* the viewport.
#[derive(Debug, Clone)]
pub struct Observer<K> {
    threshold: f32,
    bottom_margin: u32,
    targets: Vec<Target<K>>,
}

impl<K: Clone + PartialEq> Observer<K> {
    pub fn new(threshold: f32, bottom_margin: u32) -> Self {
        Self {
            threshold,
            bottom_margin,
            targets: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_observing(&self, key: &K) -> bool {
        self.targets.iter().any(|t| &t.key == key)
    }

    /// Start watching `key`. Re-observing an existing key updates its region.
    pub fn observe(&mut self, key: K, region: Region) {
        match self.targets.iter_mut().find(|t| t.key == key) {
            Some(t) => t.region = region,
            None => self.targets.push(Target {
                key,
                region,
                intersecting: false,
            }),
        }
    }

    pub fn unobserve(&mut self, key: &K) {
        self.targets.retain(|t| &t.key != key);
    }

    /// Keys whose region crossed into view since the last check.
    pub fn check(&mut self, viewport: Viewport) -> Vec<K> {
        let mut entered = vec![];
        for t in &mut self.targets {
            let ratio = viewport.intersection_ratio(t.region, self.bottom_margin);
            let now = if self.threshold <= 0.0 {
                ratio > 0.0
            } else {
                ratio >= self.threshold
            };
            if now && !t.intersecting {
                entered.push(t.key.clone());
            }
            t.intersecting = now;
        }
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        offset: 0,
        height: 400,
    };

    #[test]
    fn fully_inside_is_one() {
        let r = Region {
            top: 100,
            height: 100,
        };
        assert_eq!(VIEW.intersection_ratio(r, 0), 1.0);
    }

    #[test]
    fn partially_visible_ratio() {
        let r = Region {
            top: 300,
            height: 200,
        };
        assert_eq!(VIEW.intersection_ratio(r, 0), 0.5);
        // margin pulls the bottom edge up
        assert_eq!(VIEW.intersection_ratio(r, 100), 0.0);
    }

    #[test]
    fn below_the_fold_is_zero() {
        let r = Region {
            top: 500,
            height: 100,
        };
        assert_eq!(VIEW.intersection_ratio(r, 0), 0.0);
    }

    #[test]
    fn zero_height_region() {
        let inside = Region {
            top: 10,
            height: 0,
        };
        let outside = Region {
            top: 410,
            height: 0,
        };
        assert_eq!(VIEW.intersection_ratio(inside, 0), 1.0);
        assert_eq!(VIEW.intersection_ratio(outside, 0), 0.0);
    }

    #[test]
    fn observer_reports_entering_once() {
        let mut obs = Observer::new(0.1, 50);
        obs.observe(
            "about",
            Region {
                top: 600,
                height: 200,
            },
        );
        assert!(obs.check(VIEW).is_empty());

        let scrolled = Viewport {
            offset: 400,
            height: 400,
        };
        assert_eq!(obs.check(scrolled), vec!["about"]);
        assert!(obs.check(scrolled).is_empty());

        // leaving and coming back reports again
        assert!(obs.check(VIEW).is_empty());
        assert_eq!(obs.check(scrolled), vec!["about"]);
    }

    #[test]
    fn threshold_must_be_met() {
        let mut obs = Observer::new(0.3, 0);
        obs.observe(
            1,
            Region {
                top: 350,
                height: 200,
            },
        );
        // 50 of 200 visible: 0.25
        assert!(obs.check(VIEW).is_empty());
        let nudged = Viewport {
            offset: 20,
            height: 400,
        };
        assert_eq!(obs.check(nudged), vec![1]);
    }

    #[test]
    fn unobserve_stops_reports() {
        let mut obs = Observer::new(0.0, 0);
        obs.observe(
            7,
            Region {
                top: 0,
                height: 10,
            },
        );
        obs.unobserve(&7);
        assert!(obs.is_empty());
        assert!(obs.check(VIEW).is_empty());
    }

    #[test]
    fn observe_again_moves_region() {
        let mut obs = Observer::new(0.0, 0);
        obs.observe(
            7,
            Region {
                top: 1000,
                height: 10,
            },
        );
        obs.observe(
            7,
            Region {
                top: 0,
                height: 10,
            },
        );
        assert_eq!(obs.len(), 1);
        assert_eq!(obs.check(VIEW), vec![7]);
    }
}

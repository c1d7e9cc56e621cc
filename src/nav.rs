use serde::{Deserialize, Serialize};

/// Scroll offset (px) past which the navbar switches to its solid style.
pub const SOLID_AFTER_PX: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    /// id of the section this link scrolls to, without the leading `#`
    pub anchor: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavbarStyle {
    #[default]
    Translucent,
    Solid,
}

impl NavbarStyle {
    pub fn for_offset(offset: u32) -> Self {
        if offset > SOLID_AFTER_PX {
            NavbarStyle::Solid
        } else {
            NavbarStyle::Translucent
        }
    }

    pub fn background_alpha(&self) -> f32 {
        match self {
            NavbarStyle::Translucent => 0.95,
            NavbarStyle::Solid => 0.98,
        }
    }

    pub fn has_shadow(&self) -> bool {
        matches!(self, NavbarStyle::Solid)
    }
}

/// Mobile menu: a hamburger control and the link list it reveals. Both
/// carry the same `active` flag.
#[derive(Debug, Clone)]
pub struct NavMenu {
    links: Vec<NavLink>,
    hamburger_active: bool,
    menu_active: bool,
    selected: usize,
}

impl NavMenu {
    pub fn new(links: Vec<NavLink>) -> Self {
        Self {
            links,
            hamburger_active: false,
            menu_active: false,
            selected: 0,
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn is_open(&self) -> bool {
        self.menu_active
    }

    pub fn hamburger_active(&self) -> bool {
        self.hamburger_active
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn toggle(&mut self) {
        self.hamburger_active = !self.hamburger_active;
        self.menu_active = !self.menu_active;
    }

    pub fn close(&mut self) {
        self.hamburger_active = false;
        self.menu_active = false;
    }

    pub fn select_next(&mut self) {
        if !self.links.is_empty() {
            self.selected = (self.selected + 1) % self.links.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.links.is_empty() {
            self.selected = (self.selected + self.links.len() - 1) % self.links.len();
        }
    }

    /// Follow link `index`: closes the menu and hands back the link.
    pub fn follow(&mut self, index: usize) -> Option<NavLink> {
        let link = self.links.get(index).cloned()?;
        self.close();
        Some(link)
    }

    pub fn follow_selected(&mut self) -> Option<NavLink> {
        self.follow(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> NavMenu {
        NavMenu::new(vec![
            NavLink {
                label: "Home".into(),
                anchor: "home".into(),
            },
            NavLink {
                label: "Contact".into(),
                anchor: "contact".into(),
            },
        ])
    }

    #[test]
    fn navbar_style_threshold() {
        assert_eq!(NavbarStyle::for_offset(0), NavbarStyle::Translucent);
        assert_eq!(NavbarStyle::for_offset(100), NavbarStyle::Translucent);
        assert_eq!(NavbarStyle::for_offset(101), NavbarStyle::Solid);
        assert!(NavbarStyle::Solid.has_shadow());
        assert!(!NavbarStyle::Translucent.has_shadow());
        assert!(NavbarStyle::Solid.background_alpha() > NavbarStyle::Translucent.background_alpha());
    }

    #[test]
    fn toggle_flips_both_controls() {
        let mut m = menu();
        m.toggle();
        assert!(m.is_open() && m.hamburger_active());
        m.toggle();
        assert!(!m.is_open() && !m.hamburger_active());
    }

    #[test]
    fn following_a_link_closes_menu() {
        let mut m = menu();
        m.toggle();
        m.select_next();
        let link = m.follow_selected().unwrap();
        assert_eq!(link.anchor, "contact");
        assert!(!m.is_open());
        assert!(!m.hamburger_active());
    }

    #[test]
    fn unknown_link_leaves_menu_alone() {
        let mut m = menu();
        m.toggle();
        assert!(m.follow(9).is_none());
        assert!(m.is_open());
    }

    #[test]
    fn selection_wraps() {
        let mut m = menu();
        m.select_prev();
        assert_eq!(m.selected(), 1);
        m.select_next();
        assert_eq!(m.selected(), 0);
    }
}

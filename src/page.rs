//! The page: owns the site content, its layout, every behavior component
//! and the timer queue that drives them. This is the adapter between the
//! components' abstract surfaces and the terminal renderer.

use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::carousel::{Carousel, AUTO_ADVANCE};
use crate::content::{SectionBody, SectionContent, SiteContent, Testimonial};
use crate::effects::{parallax_offset, Counter, LazyImage, Reveal, ScrollToTop, COUNTER_STEP};
use crate::form::{ContactForm, SubmitOutcome, SubmitTarget, MISSING_FIELDS_MESSAGE};
use crate::loader::PageLoader;
use crate::nav::{NavMenu, NavbarStyle};
use crate::notify::{NotificationKind, Notifications};
use crate::pacing::{Debounce, Throttle, RESIZE_DEBOUNCE, SCROLL_THROTTLE};
use crate::surface::Deck;
use crate::timer::TimerQueue;
use crate::typing::TypingAnimation;
use crate::visibility::{Observer, Region, Viewport};

/// Page pixels per terminal row. Scroll thresholds and margins are kept in
/// pixels so they read the same as on the web.
pub const ROW_PX: u32 = 20;
pub const NAVBAR_ROWS: u32 = 3;
pub const IMAGE_ROWS: u32 = 4;
const MIN_HERO_ROWS: u32 = 12;
const SECTION_CHROME_ROWS: u32 = 4;

/// Deferred work on the page's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    TypingStep,
    CarouselAdvance,
    LoaderFade,
    LoaderRemove,
    NotificationSlideOut(u64),
    NotificationRemove(u64),
    CounterStep,
    ResizeSettled(u64),
}

/// What keyboard input is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum InputMode {
    #[default]
    Browse,
    Menu,
    Form,
}

#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    pub reduced_motion: bool,
    pub cols: u16,
    pub rows: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowSpan {
    pub top: u32,
    pub height: u32,
}

impl RowSpan {
    pub fn region(&self) -> Region {
        Region {
            top: self.top * ROW_PX,
            height: self.height * ROW_PX,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub hero: Option<RowSpan>,
    pub sections: Vec<RowSpan>,
    pub total_rows: u32,
}

impl PageLayout {
    pub fn compute(content: &SiteContent, cols: u16, rows: u16) -> Self {
        let mut cursor = 0;
        let hero = content.hero.as_ref().map(|_| {
            let span = RowSpan {
                top: 0,
                height: (rows as u32).max(MIN_HERO_ROWS),
            };
            cursor = span.height;
            span
        });
        if hero.is_none() {
            cursor = NAVBAR_ROWS;
        }

        let sections = content
            .sections
            .iter()
            .map(|s| {
                let span = RowSpan {
                    top: cursor,
                    height: section_rows(s, cols),
                };
                cursor += span.height;
                span
            })
            .collect();

        Self {
            hero,
            sections,
            total_rows: cursor,
        }
    }
}

/// Rows a section needs at the given terminal width, title and frame included.
pub fn section_rows(section: &SectionContent, cols: u16) -> u32 {
    let width = (cols as usize).saturating_sub(6).max(10);
    let body = match &section.body {
        SectionBody::Text { body } => wrapped_lines(body, width),
        SectionBody::Stats { .. } => 3,
        SectionBody::Video { caption } => 5 + wrapped_lines(caption, width),
        SectionBody::Gallery { images } => IMAGE_ROWS * images.len() as u32,
        SectionBody::Services { offers } => offers
            .iter()
            .map(|o| 1 + wrapped_lines(&o.blurb, width))
            .sum(),
        SectionBody::Testimonials { items } => {
            let quote = items
                .iter()
                .map(|t| wrapped_lines(&t.quote, width))
                .max()
                .unwrap_or(1);
            // quote, author, blank, controls
            quote + 3
        }
        SectionBody::Contact { form } => {
            form.fields
                .iter()
                .map(|f| if f.multiline { 5 } else { 3 })
                .sum::<u32>()
                + 3
        }
    };
    body + SECTION_CHROME_ROWS
}

/// Greedy word-wrapped line count of `text` at `width` columns.
pub fn wrapped_lines(text: &str, width: usize) -> u32 {
    let width = width.max(1);
    let mut lines = 0;
    for paragraph in text.lines() {
        let mut line_width = 0;
        lines += 1;
        for word in paragraph.split_whitespace() {
            let w = word.width();
            if line_width == 0 {
                line_width = w;
            } else if line_width + 1 + w <= width {
                line_width += 1 + w;
            } else {
                lines += 1;
                line_width = w;
            }
            while line_width > width {
                lines += 1;
                line_width -= width;
            }
        }
    }
    lines.max(1)
}

#[derive(Debug, Clone)]
pub struct PageImage {
    pub section: usize,
    pub slot: usize,
    pub image: LazyImage,
}

#[derive(Debug, Clone)]
pub struct StatSlot {
    pub label: String,
    pub counter: Option<Counter>,
}

impl StatSlot {
    pub fn text(&self) -> &str {
        self.counter.as_ref().map_or(self.label.as_str(), Counter::text)
    }
}

pub struct Page {
    content: SiteContent,
    layout: PageLayout,
    cols: u16,
    rows: u16,
    viewport: Viewport,
    reduced_motion: bool,
    mode: InputMode,
    timers: TimerQueue<Task>,

    headline: String,
    typing: Option<TypingAnimation>,
    carousel: Option<Carousel<Deck<Testimonial>>>,
    carousel_section: Option<usize>,

    nav: NavMenu,
    navbar: NavbarStyle,
    parallax: u32,
    scroll_top: ScrollToTop,
    reveals: Vec<Reveal>,
    video_visible: Vec<bool>,
    images: Vec<PageImage>,
    stats: Vec<StatSlot>,
    stats_section: Option<usize>,
    counters_started: bool,

    loader: PageLoader,
    notifications: Notifications,
    form: Option<ContactForm>,
    form_section: Option<usize>,
    submit_target: Box<dyn SubmitTarget>,

    scroll_throttle: Throttle,
    resize_debounce: Debounce,
    reveal_watch: Observer<usize>,
    video_watch: Observer<usize>,
    image_watch: Observer<usize>,
    stats_watch: Observer<usize>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("title", &self.content.title)
            .field("viewport", &self.viewport)
            .field("mode", &self.mode)
            .field("now_ms", &self.timers.now_ms())
            .finish_non_exhaustive()
    }
}

impl Page {
    pub fn new(content: SiteContent, options: PageOptions, submit_target: Box<dyn SubmitTarget>) -> Self {
        let sections = &content.sections;
        let typing = content
            .hero
            .as_ref()
            .and_then(|h| TypingAnimation::new(h.words.clone(), content.typing));

        let carousel_section = sections
            .iter()
            .position(|s| matches!(s.body, SectionBody::Testimonials { .. }));
        let carousel = carousel_section.and_then(|i| match &sections[i].body {
            SectionBody::Testimonials { items } => Carousel::new(Deck::new(items.clone())),
            _ => None,
        });

        let stats_section = sections
            .iter()
            .position(|s| matches!(s.body, SectionBody::Stats { .. }));
        let stats = stats_section
            .map(|i| match &sections[i].body {
                SectionBody::Stats { counters } => counters
                    .iter()
                    .map(|label| StatSlot {
                        label: label.clone(),
                        counter: Counter::parse(label),
                    })
                    .collect(),
                _ => vec![],
            })
            .unwrap_or_default();

        let form_section = sections
            .iter()
            .position(|s| matches!(s.body, SectionBody::Contact { .. }));
        let form = form_section.and_then(|i| match &sections[i].body {
            SectionBody::Contact { form } => ContactForm::new(form)
                .map_err(|e| warn!(error = %e, "contact form disabled"))
                .ok(),
            _ => None,
        });

        let images = sections
            .iter()
            .enumerate()
            .flat_map(|(section, s)| match &s.body {
                SectionBody::Gallery { images } => images
                    .iter()
                    .enumerate()
                    .map(|(slot, img)| PageImage {
                        section,
                        slot,
                        image: LazyImage::new(img),
                    })
                    .collect(),
                _ => vec![],
            })
            .collect();

        let reveals = sections
            .iter()
            .map(|s| if s.reveal { Reveal::hidden() } else { Reveal::shown() })
            .collect();

        let mut page = Self {
            layout: PageLayout::default(),
            cols: options.cols,
            rows: options.rows,
            viewport: Viewport {
                offset: 0,
                height: options.rows as u32 * ROW_PX,
            },
            reduced_motion: options.reduced_motion,
            mode: InputMode::Browse,
            timers: TimerQueue::new(),
            headline: String::new(),
            typing,
            carousel,
            carousel_section,
            nav: NavMenu::new(content.nav.clone()),
            navbar: NavbarStyle::default(),
            parallax: 0,
            scroll_top: ScrollToTop::default(),
            reveals,
            video_visible: vec![false; sections.len()],
            images,
            stats,
            stats_section,
            counters_started: false,
            loader: PageLoader::new(),
            notifications: Notifications::new(),
            form,
            form_section,
            submit_target,
            scroll_throttle: Throttle::new(SCROLL_THROTTLE),
            resize_debounce: Debounce::new(RESIZE_DEBOUNCE),
            reveal_watch: Observer::new(0.1, 50),
            video_watch: Observer::new(0.3, 100),
            image_watch: Observer::new(0.0, 0),
            stats_watch: Observer::new(0.0, 0),
            content,
        };

        page.relayout();

        if page.carousel.is_some() {
            page.timers.schedule_every(AUTO_ADVANCE, Task::CarouselAdvance);
        }
        if let Some(typing) = page.typing.as_mut() {
            if let Some(delay) = typing.start(&mut page.headline, page.reduced_motion) {
                page.timers.schedule(delay, Task::TypingStep);
            }
        }
        page.check_visibility();

        info!(
            title = %page.content.title,
            sections = page.content.sections.len(),
            reduced_motion = page.reduced_motion,
            "page ready"
        );
        page
    }

    // ----- accessors used by the renderer and tests -----

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_offset(&self) -> u32 {
        self.viewport.offset
    }

    pub fn scroll_row(&self) -> u32 {
        self.viewport.offset / ROW_PX
    }

    pub fn max_scroll(&self) -> u32 {
        (self.layout.total_rows * ROW_PX).saturating_sub(self.viewport.height)
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn typing(&self) -> Option<&TypingAnimation> {
        self.typing.as_ref()
    }

    pub fn carousel(&self) -> Option<&Carousel<Deck<Testimonial>>> {
        self.carousel.as_ref()
    }

    pub fn carousel_section(&self) -> Option<usize> {
        self.carousel_section
    }

    pub fn nav(&self) -> &NavMenu {
        &self.nav
    }

    pub fn navbar(&self) -> NavbarStyle {
        self.navbar
    }

    pub fn parallax(&self) -> u32 {
        self.parallax
    }

    pub fn scroll_top(&self) -> ScrollToTop {
        self.scroll_top
    }

    pub fn reveal(&self, section: usize) -> Reveal {
        self.reveals.get(section).copied().unwrap_or_else(Reveal::shown)
    }

    pub fn video_visible(&self, section: usize) -> bool {
        self.video_visible.get(section).copied().unwrap_or(false)
    }

    pub fn images(&self) -> &[PageImage] {
        &self.images
    }

    pub fn images_in(&self, section: usize) -> impl Iterator<Item = &PageImage> {
        self.images.iter().filter(move |i| i.section == section)
    }

    pub fn stats(&self) -> &[StatSlot] {
        &self.stats
    }

    pub fn stats_section(&self) -> Option<usize> {
        self.stats_section
    }

    pub fn loader(&self) -> &PageLoader {
        &self.loader
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn form(&self) -> Option<&ContactForm> {
        self.form.as_ref()
    }

    pub fn form_section(&self) -> Option<usize> {
        self.form_section
    }

    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.content.sections.iter().position(|s| s.id == id)
    }

    // ----- lifecycle -----

    /// All page resources are in; start the loader's exit.
    pub fn on_load(&mut self) {
        if let Some(delay) = self.loader.on_load() {
            self.timers.schedule(delay, Task::LoaderFade);
        }
    }

    /// Advance the virtual clock to `now_ms`, running every task that falls
    /// due on the way, then refresh visibility.
    pub fn on_tick(&mut self, now_ms: u64) {
        while let Some(task) = self.timers.pop_due(now_ms) {
            self.run(task);
        }
        self.timers.settle(now_ms);
        self.check_visibility();
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::TypingStep => {
                if let Some(typing) = self.typing.as_mut() {
                    if let Some(delay) = typing.step(&mut self.headline) {
                        self.timers.schedule(delay, Task::TypingStep);
                    }
                }
            }
            Task::CarouselAdvance => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.auto_advance();
                }
            }
            Task::LoaderFade => {
                if let Some(delay) = self.loader.fade() {
                    self.timers.schedule(delay, Task::LoaderRemove);
                }
            }
            Task::LoaderRemove => {
                self.loader.remove();
                debug!("loader removed");
            }
            Task::NotificationSlideOut(id) => {
                if let Some(delay) = self.notifications.dismiss(id) {
                    self.timers.schedule(delay, Task::NotificationRemove(id));
                }
            }
            Task::NotificationRemove(id) => self.notifications.remove(id),
            Task::CounterStep => self.step_counters(),
            Task::ResizeSettled(generation) => {
                if self.resize_debounce.should_fire(generation) {
                    self.relayout();
                    self.check_visibility();
                }
            }
        }
    }

    // ----- viewport -----

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.viewport.height = rows as u32 * ROW_PX;
        self.viewport.offset = self.viewport.offset.min(self.max_scroll());
        let (generation, wait) = self.resize_debounce.call();
        self.timers.schedule(wait, Task::ResizeSettled(generation));
    }

    pub fn scroll_to(&mut self, offset: u32) {
        let offset = offset.min(self.max_scroll());
        self.viewport.offset = offset;

        self.navbar = NavbarStyle::for_offset(offset);
        self.parallax = parallax_offset(offset);
        self.scroll_top.on_scroll(offset);

        if self.scroll_throttle.admit(self.timers.now_ms()) {
            self.check_visibility();
        }
    }

    pub fn scroll_by_rows(&mut self, rows: i32) {
        let target = self.viewport.offset as i64 + rows as i64 * ROW_PX as i64;
        self.scroll_to(target.max(0) as u32);
    }

    pub fn page_down(&mut self) {
        self.scroll_by_rows(self.rows.saturating_sub(NAVBAR_ROWS as u16) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_by_rows(-(self.rows.saturating_sub(NAVBAR_ROWS as u16) as i32));
    }

    /// Scroll-to-top control.
    pub fn scroll_to_top(&mut self) {
        self.scroll_to(0);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_to(self.max_scroll());
    }

    /// Bring the section with `anchor` to the top of the viewport. Unknown
    /// anchors are ignored.
    pub fn scroll_to_anchor(&mut self, anchor: &str) -> bool {
        let anchor = anchor.trim_start_matches('#');
        let Some(span) = self
            .section_index(anchor)
            .and_then(|i| self.layout.sections.get(i).copied())
        else {
            debug!(anchor, "no such anchor");
            return false;
        };
        // land just below the fixed navbar
        let top = span.region().top.saturating_sub(NAVBAR_ROWS * ROW_PX);
        self.scroll_to(top);
        true
    }

    // ----- navigation -----

    pub fn toggle_menu(&mut self) {
        self.nav.toggle();
        self.mode = if self.nav.is_open() {
            InputMode::Menu
        } else {
            InputMode::Browse
        };
    }

    pub fn menu_next(&mut self) {
        self.nav.select_next();
    }

    pub fn menu_prev(&mut self) {
        self.nav.select_prev();
    }

    pub fn follow_selected_link(&mut self) {
        if let Some(link) = self.nav.follow_selected() {
            self.mode = InputMode::Browse;
            self.scroll_to_anchor(&link.anchor);
        }
    }

    pub fn follow_link(&mut self, index: usize) {
        if let Some(link) = self.nav.follow(index) {
            self.mode = InputMode::Browse;
            self.scroll_to_anchor(&link.anchor);
        }
    }

    // ----- carousel controls -----

    pub fn carousel_next(&mut self) {
        if let Some(c) = self.carousel.as_mut() {
            c.next();
        }
    }

    pub fn carousel_prev(&mut self) {
        if let Some(c) = self.carousel.as_mut() {
            c.prev();
        }
    }

    /// Indicator dot click.
    pub fn carousel_go_to(&mut self, index: usize) {
        if let Some(c) = self.carousel.as_mut() {
            c.go_to_slide(index as isize);
        }
    }

    // ----- notifications -----

    pub fn notify(&mut self, message: &str, kind: NotificationKind) {
        let (id, delay) = self.notifications.show(message, kind);
        self.timers.schedule(delay, Task::NotificationSlideOut(id));
    }

    pub fn close_notification(&mut self) {
        if let Some((id, delay)) = self.notifications.close() {
            self.timers.schedule(delay, Task::NotificationRemove(id));
        }
    }

    // ----- contact form -----

    /// Booking button: preselect a consultation and jump to the form.
    pub fn book_consultation(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        form.select_consultation();
        if let Some(i) = self.form_section {
            let id = self.content.sections[i].id.clone();
            self.scroll_to_anchor(&id);
        }
    }

    pub fn focus_form(&mut self) {
        if self.form.is_none() {
            return;
        }
        self.mode = InputMode::Form;
        if let Some(span) = self.form_section.and_then(|i| self.layout.sections.get(i).copied()) {
            let region = span.region();
            if self.viewport.intersection_ratio(region, 0) < 1.0 {
                self.scroll_to(region.top.saturating_sub(NAVBAR_ROWS * ROW_PX));
            }
        }
    }

    pub fn leave_form(&mut self) {
        if self.mode == InputMode::Form {
            self.mode = InputMode::Browse;
        }
    }

    pub fn form_input(&mut self, c: char) {
        if let Some(form) = self.form.as_mut() {
            form.insert_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.backspace();
        }
    }

    pub fn form_focus_next(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.focus_next();
        }
    }

    pub fn form_focus_prev(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.focus_prev();
        }
    }

    pub fn set_form_value(&mut self, name: &str, value: &str) -> bool {
        self.form.as_mut().is_some_and(|f| f.set_value(name, value))
    }

    /// Validate and, when complete, hand the submission to the target.
    pub fn submit_form(&mut self) -> Option<SubmitOutcome> {
        let outcome = self.form.as_mut()?.submit();
        match &outcome {
            SubmitOutcome::Blocked(missing) => {
                debug!(?missing, "contact form blocked");
                self.notify(MISSING_FIELDS_MESSAGE, NotificationKind::Error);
            }
            SubmitOutcome::Pending => debug!("contact form already sending"),
            SubmitOutcome::Proceed(submission) => {
                if let Err(e) = self.submit_target.deliver(submission) {
                    warn!(error = %e, "contact form handoff failed");
                    if let Some(form) = self.form.as_mut() {
                        form.reset_button();
                    }
                }
            }
        }
        Some(outcome)
    }

    // ----- internals -----

    fn relayout(&mut self) {
        self.layout = PageLayout::compute(&self.content, self.cols, self.rows);
        self.viewport.offset = self.viewport.offset.min(self.max_scroll());

        for (i, (section, span)) in self
            .content
            .sections
            .iter()
            .zip(&self.layout.sections)
            .enumerate()
        {
            let region = span.region();
            if section.reveal && !self.reveals[i].animated {
                self.reveal_watch.observe(i, region);
            }
            if matches!(section.body, SectionBody::Video { .. }) && !self.video_visible[i] {
                self.video_watch.observe(i, region);
            }
            if Some(i) == self.stats_section && !self.counters_started {
                self.stats_watch.observe(i, region);
            }
        }

        for (n, img) in self.images.iter().enumerate() {
            if !img.image.is_lazy() {
                continue;
            }
            if let Some(span) = self.layout.sections.get(img.section) {
                let region = RowSpan {
                    top: span.top + 2 + img.slot as u32 * IMAGE_ROWS,
                    height: IMAGE_ROWS,
                }
                .region();
                self.image_watch.observe(n, region);
            }
        }
    }

    fn check_visibility(&mut self) {
        let vp = self.viewport;

        for i in self.reveal_watch.check(vp) {
            self.reveals[i].reveal();
            self.reveal_watch.unobserve(&i);
        }
        for i in self.video_watch.check(vp) {
            self.video_visible[i] = true;
            self.video_watch.unobserve(&i);
        }
        for n in self.image_watch.check(vp) {
            self.images[n].image.load();
            self.image_watch.unobserve(&n);
            debug!(src = self.images[n].image.src(), "lazy image loaded");
        }
        for i in self.stats_watch.check(vp) {
            self.stats_watch.unobserve(&i);
            self.start_counters();
        }
    }

    fn start_counters(&mut self) {
        if self.counters_started {
            return;
        }
        self.counters_started = true;
        self.step_counters();
    }

    fn step_counters(&mut self) {
        let mut running = false;
        for counter in self.stats.iter_mut().filter_map(|s| s.counter.as_mut()) {
            running |= counter.step();
        }
        if running {
            self.timers.schedule(COUNTER_STEP, Task::CounterStep);
        }
    }
}

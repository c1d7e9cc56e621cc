use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vitrine::content::SiteContent;
use vitrine::error::Result;
use vitrine::form::{Submission, SubmitTarget};
use vitrine::loader::LoaderState;
use vitrine::page::{InputMode, Page, PageOptions, ROW_PX};
use vitrine::runtime::{FixedTicker, PageEvent, Runner, TestEventSource};

struct NullTarget;

impl SubmitTarget for NullTarget {
    fn deliver(&mut self, _: &Submission) -> Result<()> {
        Ok(())
    }
}

fn site_page(reduced_motion: bool) -> Page {
    Page::new(
        SiteContent::embedded().unwrap(),
        PageOptions {
            reduced_motion,
            cols: 100,
            rows: 30,
        },
        Box::new(NullTarget),
    )
}

// Headless run using the internal runtime without a TTY.
// Each runner step advances a virtual clock by one tick.
#[test]
fn headless_session_scrolls_and_settles() {
    let mut page = site_page(false);
    page.on_load();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    for code in [KeyCode::Char('m'), KeyCode::Down, KeyCode::Down, KeyCode::Enter] {
        tx.send(PageEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }
    drop(tx);

    let mut now = 0;
    for _ in 0..200u32 {
        match runner.step() {
            PageEvent::Key(key) => match (page.mode(), key.code) {
                (_, KeyCode::Char('m')) => page.toggle_menu(),
                (InputMode::Menu, KeyCode::Down) => page.menu_next(),
                (InputMode::Menu, KeyCode::Enter) => page.follow_selected_link(),
                _ => {}
            },
            PageEvent::Resize(cols, rows) => page.resize(cols, rows),
            PageEvent::Mouse(_) | PageEvent::Tick => {}
        }
        now += 50;
        page.on_tick(now);
    }

    // menu closed on follow, landed on the services section
    assert_eq!(page.mode(), InputMode::Browse);
    assert!(!page.nav().is_open());
    let services = page.section_index("services").unwrap();
    assert!(page.reveal(services).is_visible());
    assert!(page.scroll_offset() > 0);

    assert_eq!(page.loader().state(), LoaderState::Removed);
    assert_eq!(page.now_ms(), 10_000);
}

#[test]
fn headless_resize_event_relayouts() {
    let mut page = site_page(true);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(PageEvent::Resize(60, 40)).unwrap();

    if let PageEvent::Resize(cols, rows) = runner.step() {
        page.resize(cols, rows);
    }
    assert_eq!(page.size(), (60, 40));
    assert_eq!(page.layout().hero.unwrap().height, 30);

    page.on_tick(250);
    assert_eq!(page.layout().hero.unwrap().height, 40);
}

#[test]
fn scroll_to_top_returns_to_origin() {
    let mut page = site_page(true);
    page.scroll_to_end();
    assert_eq!(page.scroll_offset(), page.max_scroll());
    assert!(page.scroll_top().is_visible());
    assert!(page.navbar().has_shadow());

    page.scroll_to_top();
    assert_eq!(page.scroll_offset(), 0);
    assert!(!page.scroll_top().is_visible());
    assert!(!page.navbar().has_shadow());
    assert_eq!(page.parallax(), 0);
}

#[test]
fn loader_lifecycle_follows_the_clock() {
    let mut page = site_page(true);
    page.on_tick(5_000);
    assert_eq!(page.loader().state(), LoaderState::Shown);

    page.on_load();
    page.on_load();
    page.on_tick(5_999);
    assert_eq!(page.loader().state(), LoaderState::Shown);
    page.on_tick(6_000);
    assert_eq!(page.loader().state(), LoaderState::Fading);
    page.on_tick(6_499);
    assert!(page.loader().is_present());
    page.on_tick(6_500);
    assert_eq!(page.loader().state(), LoaderState::Removed);
}

#[test]
fn lazy_images_load_when_scrolled_into_view() {
    let mut page = site_page(true);
    assert!(page.images().iter().all(|img| img.image.is_lazy()));

    page.scroll_to_anchor("gallery");
    page.on_tick(20);
    let gallery = page.section_index("gallery").unwrap();
    let loaded = page
        .images_in(gallery)
        .filter_map(|img| img.image.src())
        .collect::<Vec<_>>();
    assert_eq!(
        loaded,
        [
            "images/office-front.jpg",
            "images/meeting-room.jpg",
            "images/library.jpg"
        ]
    );
}

#[test]
fn video_section_shows_once_mostly_in_view() {
    let mut page = site_page(true);
    let video = page.section_index("video").unwrap();
    assert!(!page.video_visible(video));

    // 30% of the section must clear the bottom 100 px of the viewport;
    // stop one row short of that
    let region = page.layout().sections[video].region();
    let needed = region.height * 3 / 10;
    let view = page.viewport().height;
    let short = region.top + needed - ROW_PX + 100 - view;
    page.scroll_to(short);
    page.on_tick(20);
    assert!(!page.video_visible(video));

    page.scroll_to_anchor("video");
    page.on_tick(40);
    assert!(page.video_visible(video));

    // stays on once seen
    page.scroll_to_top();
    page.on_tick(60);
    assert_eq!(page.scroll_offset(), 0);
    assert!(page.video_visible(video));
}

#[test]
fn counters_run_to_their_targets_once_seen() {
    let mut page = site_page(true);
    let labels = |p: &Page| p.stats().iter().map(|s| s.text().to_string()).collect::<Vec<_>>();
    let idle = |p: &Page| p.stats().iter().all(|s| !s.counter.as_ref().unwrap().is_done());
    assert_eq!(labels(&page), ["500+", "25+", "98%"]);

    page.on_tick(3_000);
    assert_eq!(labels(&page), ["500+", "25+", "98%"]);
    assert!(idle(&page));

    page.scroll_to_anchor("stats");
    page.on_tick(3_010);
    assert_ne!(labels(&page), ["500+", "25+", "98%"]);

    page.on_tick(6_000);
    assert_eq!(labels(&page), ["500+", "25+", "98%"]);
    assert!(page.stats().iter().all(|s| s.counter.as_ref().unwrap().is_done()));
}

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use vitrine::{
    app_dirs::AppDirs,
    config::{FileSettingsStore, Settings, SettingsStore},
    content::SiteContent,
    form::BrowserHandoff,
    logging,
    page::{InputMode, Page, PageOptions},
    runtime::{CrosstermEventSource, FixedTicker, PageEvent, PageEventSource, Runner, Ticker},
};

const WHEEL_ROWS: i32 = 3;

/// a single-page site, scrolled in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Renders a landing page in the terminal: typed headline, testimonial carousel, lazy images, animated counters and a contact form."
)]
pub struct Cli {
    /// site content JSON to render instead of the built-in page
    #[clap(short = 'c', long)]
    content: Option<PathBuf>,

    /// show final states immediately instead of animating them
    #[clap(long)]
    reduced_motion: bool,

    /// milliseconds between animation frames
    #[clap(long)]
    tick_ms: Option<u64>,

    /// write the effective settings back to the settings file
    #[clap(long)]
    save_settings: bool,

    /// where to write the log (defaults to the local state dir)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command line flags win over saved settings.
    fn apply(&self, mut settings: Settings) -> Settings {
        if self.reduced_motion {
            settings.reduced_motion = true;
        }
        if let Some(ms) = self.tick_ms {
            settings.tick_ms = ms;
        }
        if let Some(path) = &self.content {
            settings.content_path = Some(path.clone());
        }
        settings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let store = FileSettingsStore::new();
    let settings = cli.apply(store.load());
    if cli.save_settings {
        store.save(&settings)?;
        info!(path = %store.path().display(), "settings saved");
    }

    let content = match &settings.content_path {
        Some(path) => SiteContent::from_path(path)?,
        None => SiteContent::embedded()?,
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut page = Page::new(
        content,
        PageOptions {
            reduced_motion: settings.prefers_reduced_motion(),
            cols: size.width,
            rows: size.height,
        },
        Box::new(BrowserHandoff),
    );
    info!(title = %page.content().title, reduced_motion = settings.prefers_reduced_motion(), "page opened");

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(settings.tick_ms.max(1))),
    );
    let result = start_tui(&mut terminal, &mut page, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: PageEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    page: &mut Page,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let started = Instant::now();
    terminal.draw(|f| f.render_widget(&*page, f.area()))?;
    // first frame is up, the page counts as loaded
    page.on_load();

    loop {
        match runner.step() {
            PageEvent::Tick => {}
            PageEvent::Key(key) => {
                if handle_key(page, key) == Flow::Quit {
                    break;
                }
            }
            PageEvent::Mouse(mouse) => handle_mouse(page, mouse),
            PageEvent::Resize(cols, rows) => page.resize(cols, rows),
        }
        page.on_tick(started.elapsed().as_millis() as u64);
        terminal.draw(|f| f.render_widget(&*page, f.area()))?;
    }
    info!("page closed");
    Ok(())
}

fn handle_key(page: &mut Page, key: KeyEvent) -> Flow {
    // ctrl+c quits from any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    match page.mode() {
        InputMode::Browse => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Down | KeyCode::Char('j') => page.scroll_by_rows(1),
            KeyCode::Up | KeyCode::Char('k') => page.scroll_by_rows(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => page.page_down(),
            KeyCode::PageUp => page.page_up(),
            KeyCode::Home | KeyCode::Char('t') => page.scroll_to_top(),
            KeyCode::End => page.scroll_to_end(),
            KeyCode::Char('m') => page.toggle_menu(),
            KeyCode::Left | KeyCode::Char('[') => page.carousel_prev(),
            KeyCode::Right | KeyCode::Char(']') => page.carousel_next(),
            KeyCode::Char(c @ '1'..='9') => page.carousel_go_to(c as usize - '1' as usize),
            KeyCode::Char('b') => page.book_consultation(),
            KeyCode::Tab => page.focus_form(),
            KeyCode::Char('x') => page.close_notification(),
            _ => {}
        },
        InputMode::Menu => match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Down | KeyCode::Char('j') => page.menu_next(),
            KeyCode::Up | KeyCode::Char('k') => page.menu_prev(),
            KeyCode::Enter => page.follow_selected_link(),
            KeyCode::Char(c @ '1'..='9') => page.follow_link(c as usize - '1' as usize),
            KeyCode::Esc | KeyCode::Char('m') => page.toggle_menu(),
            _ => {}
        },
        InputMode::Form => match key.code {
            KeyCode::Esc => page.leave_form(),
            KeyCode::Tab | KeyCode::Down => page.form_focus_next(),
            KeyCode::BackTab | KeyCode::Up => page.form_focus_prev(),
            KeyCode::Backspace => page.form_backspace(),
            KeyCode::Enter => {
                if page.submit_form().is_none() {
                    warn!("submit pressed without a form");
                }
            }
            KeyCode::Char(c) => page.form_input(c),
            _ => {}
        },
    }
    Flow::Continue
}

fn handle_mouse(page: &mut Page, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => page.scroll_by_rows(WHEEL_ROWS),
        MouseEventKind::ScrollUp => page.scroll_by_rows(-WHEEL_ROWS),
        MouseEventKind::Down(MouseButton::Left) => {
            let (cols, rows) = page.size();
            // the floating ↑ button
            let on_button = mouse.row + 3 == rows
                && mouse.column + 5 >= cols
                && mouse.column + 2 < cols;
            if on_button && page.scroll_top().is_visible() {
                page.scroll_to_top();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use vitrine::error::Result;
    use vitrine::form::{Submission, SubmitTarget};
    use vitrine::notify::NotificationKind;

    struct NullTarget;

    impl SubmitTarget for NullTarget {
        fn deliver(&mut self, _: &Submission) -> Result<()> {
            Ok(())
        }
    }

    fn page() -> Page {
        Page::new(
            SiteContent::embedded().unwrap(),
            PageOptions {
                reduced_motion: true,
                cols: 100,
                rows: 30,
            },
            Box::new(NullTarget),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["vitrine"]);
        assert_eq!(cli.content, None);
        assert!(!cli.reduced_motion);
        assert_eq!(cli.tick_ms, None);
        assert!(!cli.save_settings);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from([
            "vitrine",
            "--reduced-motion",
            "--tick-ms",
            "20",
            "-c",
            "site.json",
        ]);
        let settings = cli.apply(Settings::default());
        assert!(settings.reduced_motion);
        assert_eq!(settings.tick_ms, 20);
        assert_eq!(settings.content_path, Some(PathBuf::from("site.json")));
    }

    #[test]
    fn test_cli_keeps_saved_settings_when_unset() {
        let saved = Settings {
            reduced_motion: true,
            tick_ms: 80,
            content_path: None,
        };
        let cli = Cli::parse_from(["vitrine"]);
        assert_eq!(cli.apply(saved.clone()), saved);
    }

    #[test]
    fn test_quit_keys() {
        let mut p = page();
        assert_eq!(handle_key(&mut p, key(KeyCode::Char('q'))), Flow::Quit);
        assert_eq!(handle_key(&mut p, key(KeyCode::Esc)), Flow::Quit);
        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        p.focus_form();
        assert_eq!(handle_key(&mut p, ctrl_c), Flow::Quit);
    }

    #[test]
    fn test_menu_mode_routes_keys() {
        let mut p = page();
        handle_key(&mut p, key(KeyCode::Char('m')));
        assert_eq!(p.mode(), InputMode::Menu);
        assert!(p.nav().is_open());

        handle_key(&mut p, key(KeyCode::Down));
        assert_eq!(p.nav().selected(), 1);
        handle_key(&mut p, key(KeyCode::Enter));
        assert_eq!(p.mode(), InputMode::Browse);
        assert!(!p.nav().is_open());
        assert!(p.scroll_offset() > 0);
    }

    #[test]
    fn test_form_mode_captures_text() {
        let mut p = page();
        handle_key(&mut p, key(KeyCode::Tab));
        assert_eq!(p.mode(), InputMode::Form);

        // 'q' is text here, not quit
        assert_eq!(handle_key(&mut p, key(KeyCode::Char('q'))), Flow::Continue);
        handle_key(&mut p, key(KeyCode::Char('x')));
        handle_key(&mut p, key(KeyCode::Backspace));
        assert_eq!(p.form().unwrap().field("name").unwrap().value, "q");

        handle_key(&mut p, key(KeyCode::Enter));
        let note = p.notifications().current().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);

        handle_key(&mut p, key(KeyCode::Esc));
        assert_eq!(p.mode(), InputMode::Browse);
    }

    #[test]
    fn test_carousel_keys() {
        let mut p = page();
        handle_key(&mut p, key(KeyCode::Right));
        assert_eq!(p.carousel().unwrap().current(), 1);
        handle_key(&mut p, key(KeyCode::Char('3')));
        assert_eq!(p.carousel().unwrap().current(), 2);
        handle_key(&mut p, key(KeyCode::Char(']')));
        assert_eq!(p.carousel().unwrap().current(), 0);
    }

    #[test]
    fn test_wheel_scrolls() {
        let mut p = page();
        let wheel = |kind| MouseEvent {
            kind,
            column: 10,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut p, wheel(MouseEventKind::ScrollDown));
        assert_eq!(p.scroll_row(), WHEEL_ROWS as u32);
        handle_mouse(&mut p, wheel(MouseEventKind::ScrollUp));
        assert_eq!(p.scroll_offset(), 0);
    }
}

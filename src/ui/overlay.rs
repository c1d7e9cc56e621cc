use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::loader::LoaderState;
use crate::nav::NavbarStyle;
use crate::page::{InputMode, Page, NAVBAR_ROWS, ROW_PX};
use crate::ui::{rgb, GOLD, GOLD_DARK, INK};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
const WIDE_NAV_COLS: u16 = 80;
const NOTIFICATION_TOP_PX: u32 = 100;

pub fn render_navbar(page: &Page, area: Rect, buf: &mut Buffer) {
    let bar = Rect::new(area.x, area.y, area.width, NAVBAR_ROWS as u16).intersection(area);
    let style = page.navbar();
    let background = match style {
        NavbarStyle::Translucent => Color::Rgb(28, 28, 28),
        NavbarStyle::Solid => INK,
    };
    let mut block = Block::default()
        .style(Style::default().bg(background))
        .padding(Padding::horizontal(2));
    if style.has_shadow() {
        block = block
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(GOLD_DARK));
    }
    let inner = block.inner(bar);
    block.render(bar, buf);
    if inner.height == 0 {
        return;
    }
    let row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);

    Paragraph::new(Span::styled(
        page.content().title.as_str(),
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
    ))
    .render(row, buf);

    let right = if area.width >= WIDE_NAV_COLS {
        page.nav()
            .links()
            .iter()
            .map(|link| link.label.as_str())
            .join("   ")
    } else if page.nav().hamburger_active() {
        "✕".to_string()
    } else {
        "☰".to_string()
    };
    Paragraph::new(Span::styled(right, Style::default().fg(Color::White)))
        .alignment(Alignment::Right)
        .render(row, buf);
}

pub fn render_menu(page: &Page, area: Rect, buf: &mut Buffer) {
    let links = page.nav().links();
    let width = links
        .iter()
        .map(|l| l.label.width() as u16 + 6)
        .max()
        .unwrap_or(0)
        .max(20);
    let rect = Rect::new(
        area.right().saturating_sub(width + 1),
        area.y + NAVBAR_ROWS as u16,
        width,
        links.len() as u16 + 2,
    )
    .intersection(area);

    let lines = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            if i == page.nav().selected() {
                Line::from(Span::styled(
                    format!("› {}", link.label),
                    Style::default().fg(Color::Black).bg(GOLD),
                ))
            } else {
                Line::from(format!("  {}", link.label))
            }
        })
        .collect::<Vec<_>>();

    Clear.render(rect, buf);
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GOLD))
                .style(Style::default().bg(INK)),
        )
        .render(rect, buf);
}

pub fn render_legend(page: &Page, area: Rect, buf: &mut Buffer) {
    if area.height <= NAVBAR_ROWS as u16 {
        return;
    }
    let help = match page.mode() {
        InputMode::Browse => {
            "↑↓ scroll  m menu  ←→ testimonials  b book  tab form  t top  x close  q quit"
        }
        InputMode::Menu => "↑↓ choose  enter go  m close",
        InputMode::Form => "type to edit  tab next field  enter send  esc leave form",
    };
    let row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    Paragraph::new(Span::styled(
        help,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(row, buf);
}

pub fn render_scroll_top(page: &Page, area: Rect, buf: &mut Buffer) {
    if !page.scroll_top().is_visible() || area.width < 5 || area.height < 3 {
        return;
    }
    let rect = Rect::new(area.right() - 5, area.bottom() - 3, 3, 1);
    Paragraph::new(Span::styled(
        " ↑ ",
        Style::default()
            .fg(Color::Black)
            .bg(GOLD)
            .add_modifier(Modifier::BOLD),
    ))
    .render(rect, buf);
}

pub fn render_notification(page: &Page, area: Rect, buf: &mut Buffer) {
    let Some(note) = page.notifications().current() else {
        return;
    };
    let text = format!(" {}  × ", note.message);
    let width = (text.width() as u16).min(area.width);
    let mut x = area.right().saturating_sub(width + 1);
    if note.leaving {
        // sliding out to the right
        x = x.saturating_add(width / 2);
    }
    let y = area.y + (NOTIFICATION_TOP_PX / ROW_PX) as u16;
    let rect = Rect::new(x, y, width, 1).intersection(area);

    Clear.render(rect, buf);
    Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .bg(rgb(note.kind.accent()))
            .add_modifier(Modifier::BOLD),
    ))
    .render(rect, buf);
}

pub fn render_loader(page: &Page, area: Rect, buf: &mut Buffer) {
    if page.loader().state() != LoaderState::Shown {
        return;
    }
    Clear.render(area, buf);
    Block::default()
        .style(Style::default().bg(INK))
        .render(area, buf);

    let frame = SPINNER[(page.now_ms() / 100) as usize % SPINNER.len()];
    let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1).intersection(area);
    Paragraph::new(Line::from(vec![
        Span::styled(frame, Style::default().fg(GOLD)),
        Span::raw(" "),
        Span::styled("Loading...", Style::default().fg(Color::White)),
    ]))
    .alignment(Alignment::Center)
    .render(row, buf);
}

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget, Wrap},
};

use crate::content::{SectionBody, SectionContent};
use crate::form::{ContactForm, SubmitButton};
use crate::page::{InputMode, Page, RowSpan, IMAGE_ROWS, ROW_PX};
use crate::ui::{rgb, GOLD, GOLD_DARK, INK};

/// Draw every section of the page into a buffer as tall as the document.
pub fn render_document(page: &Page, buf: &mut Buffer) {
    if let Some(span) = page.layout().hero {
        render_hero(page, span, buf);
    }
    for (i, (section, span)) in page
        .content()
        .sections
        .iter()
        .zip(&page.layout().sections)
        .enumerate()
    {
        render_section(page, i, section, *span, buf);
    }
}

fn row_rect(span: RowSpan, bounds: Rect) -> Rect {
    let top = span.top.min(u16::MAX as u32) as u16;
    let height = span.height.min(u16::MAX as u32) as u16;
    Rect::new(bounds.x, top, bounds.width, height).intersection(bounds)
}

fn render_hero(page: &Page, span: RowSpan, buf: &mut Buffer) {
    let area = row_rect(span, buf.area);
    Block::default()
        .style(Style::default().bg(INK))
        .render(area, buf);

    let Some(hero) = &page.content().hero else {
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", hero.lead), bold.fg(Color::White)),
            Span::styled(page.headline(), bold.fg(GOLD)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            hero.tagline.as_str(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    // parallax: the hero text drifts down at half the scroll speed
    let shift = (page.parallax() / ROW_PX) as u16;
    let text_rows = lines.len() as u16 + 1;
    let top = area.y + area.height.saturating_sub(text_rows) / 2 + shift;
    if top >= area.bottom() {
        return;
    }
    let rows = text_rows.min(area.bottom() - top);
    let text_area = Rect::new(area.x + 2, top, area.width.saturating_sub(4), rows);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(text_area, buf);
}

fn render_section(
    page: &Page,
    index: usize,
    section: &SectionContent,
    span: RowSpan,
    buf: &mut Buffer,
) {
    if !page.reveal(index).is_visible() {
        return;
    }
    let area = row_rect(span, buf.area);
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", section.title),
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 0));
    let inner = block.inner(area);
    block.render(area, buf);

    match &section.body {
        SectionBody::Text { body } => {
            Paragraph::new(body.as_str())
                .wrap(Wrap { trim: true })
                .render(inner, buf);
        }
        SectionBody::Stats { .. } => render_stats(page, inner, buf),
        SectionBody::Video { caption } => {
            render_video(page.video_visible(index), caption, inner, buf)
        }
        SectionBody::Gallery { .. } => render_gallery(page, index, inner, buf),
        SectionBody::Services { offers } => {
            let mut lines = vec![];
            for offer in offers {
                lines.push(Line::from(Span::styled(
                    offer.title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    offer.blurb.as_str(),
                    Style::default().fg(Color::Gray),
                )));
            }
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .render(inner, buf);
        }
        SectionBody::Testimonials { items } => {
            if page.carousel_section() == Some(index) {
                render_carousel(page, inner, buf);
            } else if let Some(first) = items.first() {
                Paragraph::new(first.quote.as_str())
                    .wrap(Wrap { trim: true })
                    .render(inner, buf);
            }
        }
        SectionBody::Contact { .. } => {
            if let Some(form) = page.form() {
                render_form(form, page.mode() == InputMode::Form, inner, buf);
            }
        }
    }
}

fn render_stats(page: &Page, area: Rect, buf: &mut Buffer) {
    let stats = page.stats();
    if stats.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, stats.len() as u32); stats.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (slot, column) in stats.iter().zip(columns.iter()) {
        Paragraph::new(Span::styled(
            slot.text(),
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(*column, buf);
    }
}

fn render_video(visible: bool, caption: &str, area: Rect, buf: &mut Buffer) {
    let width = area.width.min(40);
    let frame = Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        area.height.min(5),
    );
    let (border, label) = if visible {
        (GOLD, "▶  Play introduction")
    } else {
        (Color::DarkGray, "")
    };
    Paragraph::new(label)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .padding(Padding::new(0, 0, 1, 0)),
        )
        .render(frame, buf);

    let below = Rect::new(
        area.x,
        frame.bottom(),
        area.width,
        area.bottom().saturating_sub(frame.bottom()),
    );
    Paragraph::new(Span::styled(
        caption,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(below, buf);
}

fn render_gallery(page: &Page, index: usize, area: Rect, buf: &mut Buffer) {
    for img in page.images_in(index) {
        let top = area.y + img.slot as u16 * IMAGE_ROWS as u16;
        if top >= area.bottom() {
            break;
        }
        let frame = Rect::new(
            area.x,
            top,
            area.width.min(60),
            (IMAGE_ROWS as u16 - 1).min(area.bottom() - top),
        );
        let body = match img.image.src() {
            Some(src) => Span::styled(format!("[img] {src}"), Style::default().fg(Color::White)),
            None => Span::styled(
                "…",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
        };
        Paragraph::new(body)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(GOLD_DARK))
                    .title(img.image.alt.as_str()),
            )
            .render(frame, buf);
    }
}

fn render_carousel(page: &Page, area: Rect, buf: &mut Buffer) {
    let Some(carousel) = page.carousel() else {
        return;
    };
    let deck = carousel.deck();
    let Some(item) = deck.shown() else {
        return;
    };

    let author = if item.role.is_empty() {
        format!("- {}", item.author)
    } else {
        format!("- {}, {}", item.author, item.role)
    };

    let dots = (0..deck.items().len()).map(|i| {
        if deck.is_active(i) {
            Span::styled("●", Style::default().fg(GOLD))
        } else {
            Span::styled("○", Style::default().fg(Color::Gray))
        }
    });
    let button = Style::default().fg(Color::Black).bg(GOLD);
    let mut controls = vec![Span::styled(" < ", button), Span::raw("  ")];
    controls.extend(Itertools::intersperse(dots, Span::raw(" ")));
    controls.push(Span::raw("  "));
    controls.push(Span::styled(" > ", button));

    let quote_rows = area.height.saturating_sub(3);
    let quote_area = Rect::new(area.x, area.y, area.width, quote_rows);
    Paragraph::new(Span::styled(
        format!("\"{}\"", item.quote),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(quote_area, buf);

    let rest = Rect::new(area.x, area.y + quote_rows, area.width, area.height - quote_rows);
    Paragraph::new(vec![
        Line::from(Span::styled(author, Style::default().fg(Color::Gray))),
        Line::default(),
        Line::from(controls),
    ])
    .alignment(Alignment::Center)
    .render(rest, buf);
}

fn render_form(form: &ContactForm, editing: bool, area: Rect, buf: &mut Buffer) {
    let mut y = area.y;
    for (idx, field) in form.fields().iter().enumerate() {
        let height = if field.spec.multiline { 5 } else { 3 };
        if y + height > area.bottom() {
            return;
        }
        let rect = Rect::new(area.x, y, area.width.min(70), height);
        y += height;

        let focused = editing && form.focus() == idx;
        let border = if focused {
            GOLD
        } else {
            field.mark.border().map_or(Color::DarkGray, rgb)
        };
        let title = if field.spec.required {
            format!("{} *", field.spec.label)
        } else {
            field.spec.label.clone()
        };
        let mut value = if field.spec.options.is_empty() {
            field.value.clone()
        } else if field.value.is_empty() {
            "(space to choose)".to_string()
        } else {
            format!("< {} >", field.value)
        };
        if focused && field.spec.options.is_empty() {
            value.push('_');
        }

        Paragraph::new(value)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(title),
            )
            .render(rect, buf);
    }

    if y + 1 < area.bottom() {
        let style = match form.button() {
            SubmitButton::Idle => Style::default()
                .fg(Color::Black)
                .bg(GOLD)
                .add_modifier(Modifier::BOLD),
            SubmitButton::Sending => Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::DIM),
        };
        let button = Rect::new(area.x, y + 1, area.width, 1);
        Paragraph::new(Span::styled(format!(" {} ", form.button_label()), style)).render(button, buf);
    }
}

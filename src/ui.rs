pub mod overlay;
pub mod sections;

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::page::Page;

pub const GOLD: Color = Color::Rgb(0xDE, 0xC5, 0x90);
pub const GOLD_DARK: Color = Color::Rgb(0x96, 0x80, 0x56);
pub const INK: Color = Color::Rgb(18, 18, 18);

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

impl Widget for &Page {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // the whole document is drawn off screen, then the scrolled window
        // is copied out so sections can be partially visible
        let height = self.layout().total_rows.min(u16::MAX as u32) as u16;
        let mut doc = Buffer::empty(Rect::new(0, 0, area.width, height));
        sections::render_document(self, &mut doc);
        blit(&doc, self.scroll_row(), area, buf);

        overlay::render_navbar(self, area, buf);
        if self.nav().is_open() {
            overlay::render_menu(self, area, buf);
        }
        overlay::render_legend(self, area, buf);
        overlay::render_scroll_top(self, area, buf);
        overlay::render_notification(self, area, buf);
        overlay::render_loader(self, area, buf);
    }
}

fn blit(doc: &Buffer, first_row: u32, area: Rect, buf: &mut Buffer) {
    for y in 0..area.height {
        let src_y = first_row + y as u32;
        if src_y >= doc.area.height as u32 {
            break;
        }
        for x in 0..area.width {
            if let (Some(src), Some(dst)) = (
                doc.cell((x, src_y as u16)),
                buf.cell_mut((area.x + x, area.y + y)),
            ) {
                *dst = src.clone();
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::buffer::Buffer;

    /// Rendered rows as plain strings.
    pub fn rows(buffer: &Buffer) -> Vec<String> {
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect()
    }

    pub fn text(buffer: &Buffer) -> String {
        rows(buffer).join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::text;
    use super::*;
    use crate::content::SiteContent;
    use crate::error::Result;
    use crate::form::{Submission, SubmitTarget};
    use crate::page::{PageOptions, ROW_PX};

    struct NullTarget;

    impl SubmitTarget for NullTarget {
        fn deliver(&mut self, _: &Submission) -> Result<()> {
            Ok(())
        }
    }

    fn site_page() -> Page {
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

    fn draw(page: &Page) -> Buffer {
        let (cols, rows) = page.size();
        let area = Rect::new(0, 0, cols, rows);
        let mut buffer = Buffer::empty(area);
        page.render(area, &mut buffer);
        buffer
    }

    #[test]
    fn loader_covers_page_until_removed() {
        let mut page = site_page();
        let screen = text(&draw(&page));
        assert!(screen.contains("Loading..."));

        page.on_load();
        page.on_tick(1_500);
        let screen = text(&draw(&page));
        assert!(!screen.contains("Loading..."));
        assert!(screen.contains("Heritage Estate Planning"));
        assert!(screen.contains("Protect your Legacy"));
    }

    #[test]
    fn scrolling_moves_the_window() {
        let mut page = site_page();
        page.on_load();
        page.on_tick(1_500);
        let top = text(&draw(&page));

        page.scroll_to_anchor("testimonials");
        page.on_tick(1_600);
        let lower = text(&draw(&page));
        assert_ne!(top, lower);
        assert!(lower.contains("What clients say"));
        assert!(page.scroll_offset() > 0);
        assert_eq!(page.scroll_offset() % ROW_PX, 0);
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let page = site_page();
        let area = Rect::new(0, 0, 3, 2);
        let mut buffer = Buffer::empty(area);
        (&page).render(area, &mut buffer);
    }
}

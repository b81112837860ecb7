use ratatui::text::{Line, Text};
use ratatui::widgets::{Paragraph, Wrap};

/// Rendered transcript plus a viewing offset, measured in wrapped rows.
///
/// When the offset sits at the bottom before a content update it follows the
/// new bottom afterwards; otherwise it stays where the reader left it (only
/// clamped if the content shrank underneath it).
pub(crate) struct ScrollWindow {
    width: u16,
    height: u16,
    lines: Vec<Line<'static>>,
    rows: u16,
    offset: u16,
}

impl ScrollWindow {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            lines: Vec::new(),
            rows: 0,
            offset: 0,
        }
    }

    pub(crate) fn set_size(&mut self, width: u16, height: u16) {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.width && height == self.height {
            return;
        }
        let follow = self.at_bottom();
        self.width = width;
        self.height = height;
        self.rows = wrapped_rows(&self.lines, self.width);
        self.reposition(follow);
    }

    pub(crate) fn set_content(&mut self, lines: Vec<Line<'static>>) {
        let follow = self.at_bottom();
        self.rows = wrapped_rows(&lines, self.width);
        self.lines = lines;
        self.reposition(follow);
    }

    #[cfg(test)]
    pub(crate) fn append(&mut self, line: Line<'static>) {
        let follow = self.at_bottom();
        let added = wrapped_rows(std::slice::from_ref(&line), self.width);
        self.rows = self.rows.saturating_add(added);
        self.lines.push(line);
        self.reposition(follow);
    }

    pub(crate) fn offset(&self) -> u16 {
        self.offset
    }

    pub(crate) fn max_offset(&self) -> u16 {
        self.rows.saturating_sub(self.height)
    }

    pub(crate) fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub(crate) fn scroll_up(&mut self, n: u16) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub(crate) fn scroll_down(&mut self, n: u16) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub(crate) fn page_up(&mut self) {
        self.scroll_up(self.page_step());
    }

    pub(crate) fn page_down(&mut self) {
        self.scroll_down(self.page_step());
    }

    pub(crate) fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub(crate) fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub(crate) fn paragraph(&self) -> Paragraph<'static> {
        Paragraph::new(Text::from(self.lines.clone()))
            .wrap(Wrap { trim: false })
            .scroll((self.offset, 0))
    }

    fn page_step(&self) -> u16 {
        self.height.saturating_sub(1).max(1)
    }

    fn reposition(&mut self, follow: bool) {
        let max = self.max_offset();
        self.offset = if follow { max } else { self.offset.min(max) };
    }
}

fn wrapped_rows(lines: &[Line<'static>], width: u16) -> u16 {
    if lines.is_empty() {
        return 0;
    }
    let paragraph = Paragraph::new(Text::from(lines.to_vec())).wrap(Wrap { trim: false });
    paragraph.line_count(width).min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<Line<'static>> {
        (0..n).map(|i| Line::from(format!("line {i}"))).collect()
    }

    #[test]
    fn append_at_bottom_follows_new_bottom() {
        let mut window = ScrollWindow::new(20, 5);
        window.set_content(numbered(10));
        assert_eq!(window.offset(), 5);
        assert!(window.at_bottom());

        window.append(Line::from("extra"));
        assert_eq!(window.max_offset(), 6);
        assert_eq!(window.offset(), 6);
    }

    #[test]
    fn scrolled_up_reader_is_not_yanked_back() {
        let mut window = ScrollWindow::new(20, 5);
        window.set_content(numbered(10));
        window.scroll_up(3);
        assert_eq!(window.offset(), 2);

        window.append(Line::from("extra"));
        window.set_content(numbered(30));
        assert_eq!(window.offset(), 2);
        assert!(!window.at_bottom());
    }

    #[test]
    fn short_content_sits_at_offset_zero() {
        let mut window = ScrollWindow::new(20, 10);
        window.set_content(numbered(3));
        assert_eq!(window.max_offset(), 0);
        assert_eq!(window.offset(), 0);
        assert!(window.at_bottom());
    }

    #[test]
    fn shrinking_content_clamps_offset() {
        let mut window = ScrollWindow::new(20, 5);
        window.set_content(numbered(30));
        window.scroll_up(10);
        window.set_content(numbered(8));
        assert_eq!(window.offset(), 3);
    }

    #[test]
    fn resize_rewraps_and_keeps_bottom() {
        let mut window = ScrollWindow::new(40, 4);
        window.set_content(vec![Line::from("x".repeat(40)); 4]);
        assert_eq!(window.max_offset(), 0);

        window.set_size(10, 4);
        assert_eq!(window.max_offset(), 12);
        assert_eq!(window.offset(), 12);
    }

    #[test]
    fn scroll_down_reaching_max_restores_following() {
        let mut window = ScrollWindow::new(20, 5);
        window.set_content(numbered(12));
        window.page_up();
        assert!(!window.at_bottom());
        window.page_down();
        window.page_down();
        assert!(window.at_bottom());
        window.append(Line::from("tail"));
        assert_eq!(window.offset(), window.max_offset());
    }
}

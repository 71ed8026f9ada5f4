//! Cursor and scroll state for carousels and lists, with their load-more triggers.

use ratatui::widgets::TableState;

/// Rows between the cursor and the last loaded item at which a list asks for more.
pub const SENTINEL_DISTANCE: usize = 5;

/// Cards shown per carousel page before the first draw measures the terminal.
const DEFAULT_VISIBLE: usize = 5;

/// Horizontal strip of cards showing `visible` items from `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    /// First visible item.
    pub offset: usize,
    /// Highlighted item.
    pub selected: usize,
    /// Items per page, measured at draw time.
    pub visible: usize,
}

impl Default for Carousel {
    fn default() -> Self {
        Self {
            offset: 0,
            selected: 0,
            visible: DEFAULT_VISIBLE,
        }
    }
}

impl Carousel {
    /// Whether the viewport is within one page of the trailing edge.
    #[must_use]
    pub const fn near_end(&self, len: usize) -> bool {
        len > 0 && self.offset.saturating_add(self.visible) >= len.saturating_sub(self.visible)
    }

    /// Sets the page width, keeping the selection visible.
    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible.max(1);
        self.reveal_selected();
    }

    /// Moves the highlight one item right.
    pub fn next(&mut self, len: usize) {
        if self.selected.saturating_add(1) < len {
            self.selected = self.selected.saturating_add(1);
            self.reveal_selected();
        }
    }

    /// Moves the highlight one item left.
    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.reveal_selected();
    }

    /// Scrolls one page right.
    ///
    /// Returns `true` if the viewport was within one page of the trailing edge
    /// before scrolling, which is when more items should be requested.
    pub fn page_right(&mut self, len: usize) -> bool {
        let near_end = self.near_end(len);
        let last_offset = len.saturating_sub(self.visible);
        self.offset = self.offset.saturating_add(self.visible).min(last_offset);
        self.selected = self.selected.max(self.offset).min(len.saturating_sub(1));
        near_end
    }

    /// Scrolls one page left.
    pub fn page_left(&mut self) {
        self.offset = self.offset.saturating_sub(self.visible);
        let last_visible = self.offset.saturating_add(self.visible).saturating_sub(1);
        self.selected = self.selected.min(last_visible);
    }

    /// Visible index range for `len` items.
    #[must_use]
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        start..self.offset.saturating_add(self.visible).min(len)
    }

    fn reveal_selected(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset.saturating_add(self.visible) {
            self.offset = self
                .selected
                .saturating_add(1)
                .saturating_sub(self.visible);
        }
    }
}

/// Vertical list cursor backed by ratatui's `TableState`.
#[derive(Debug, Default, Clone)]
pub struct ListCursor {
    /// Table state (selection and scroll).
    pub table: TableState,
}

impl ListCursor {
    /// Selected row, 0 when nothing is selected.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.table.selected().unwrap_or(0)
    }

    /// Resets to the top.
    pub fn reset(&mut self) {
        self.table = TableState::default();
    }

    /// Ensures a row is selected once the list has items.
    pub fn sync(&mut self, len: usize) {
        if len == 0 {
            self.table.select(None);
        } else if self.table.selected().is_none_or(|s| s >= len) {
            self.table.select(Some(self.selected().min(len.saturating_sub(1))));
        }
    }

    /// Moves up one row.
    pub fn up(&mut self) {
        self.table.select(Some(self.selected().saturating_sub(1)));
    }

    /// Moves down one row.
    pub fn down(&mut self, len: usize) {
        if self.selected().saturating_add(1) < len {
            self.table.select(Some(self.selected().saturating_add(1)));
        }
    }

    /// Moves up a page.
    pub fn page_up(&mut self, page: usize) {
        self.table
            .select(Some(self.selected().saturating_sub(page.max(1))));
    }

    /// Moves down a page.
    pub fn page_down(&mut self, page: usize, len: usize) {
        if len == 0 {
            return;
        }
        let target = self.selected().saturating_add(page.max(1));
        self.table.select(Some(target.min(len.saturating_sub(1))));
    }

    /// Whether the cursor is close enough to the end to load the next page.
    #[must_use]
    pub fn near_sentinel(&self, len: usize) -> bool {
        len > 0 && self.selected().saturating_add(SENTINEL_DISTANCE) >= len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(offset: usize, visible: usize) -> Carousel {
        Carousel {
            offset,
            selected: offset,
            visible,
        }
    }

    #[test]
    fn test_edge_trigger_only_near_trailing_edge() {
        // Arrange
        let len = 20;

        // Act & Assert
        assert!(!carousel(0, 5).near_end(len));
        assert!(!carousel(5, 5).near_end(len));
        assert!(carousel(10, 5).near_end(len));
        assert!(carousel(15, 5).near_end(len));
        assert!(!carousel(0, 5).near_end(0));
    }

    #[test]
    fn test_page_right_reports_pre_scroll_edge() {
        // Arrange
        let mut c = carousel(5, 5);

        // Act
        let first = c.page_right(20);
        let second = c.page_right(20);

        // Assert
        assert!(!first);
        assert_eq!(c.offset, 15);
        assert!(second);
    }

    #[test]
    fn test_page_right_clamps_to_last_page() {
        // Arrange
        let mut c = carousel(0, 5);

        // Act
        c.page_right(7);

        // Assert
        assert_eq!(c.offset, 2);
        assert_eq!(c.window(7), 2..7);
        assert_eq!(c.selected, 2);
    }

    #[test]
    fn test_next_scrolls_to_reveal() {
        // Arrange
        let mut c = carousel(0, 3);

        // Act
        for _ in 0..4 {
            c.next(10);
        }

        // Assert
        assert_eq!(c.selected, 4);
        assert_eq!(c.offset, 2);
    }

    #[test]
    fn test_page_left_keeps_selection_visible() {
        // Arrange
        let mut c = Carousel {
            offset: 10,
            selected: 12,
            visible: 5,
        };

        // Act
        c.page_left();

        // Assert
        assert_eq!(c.offset, 5);
        assert_eq!(c.selected, 9);
    }

    #[test]
    fn test_list_sentinel() {
        // Arrange
        let mut cursor = ListCursor::default();
        cursor.sync(20);

        // Act & Assert
        assert!(!cursor.near_sentinel(20));
        cursor.page_down(14, 20);
        assert!(!cursor.near_sentinel(20));
        cursor.down(20);
        assert!(cursor.near_sentinel(20));
        assert!(!ListCursor::default().near_sentinel(0));
    }

    #[test]
    fn test_list_cursor_bounds() {
        // Arrange
        let mut cursor = ListCursor::default();
        cursor.sync(3);

        // Act
        cursor.up();
        cursor.down(3);
        cursor.down(3);
        cursor.down(3);

        // Assert
        assert_eq!(cursor.selected(), 2);
        cursor.sync(0);
        assert_eq!(cursor.table.selected(), None);
    }
}

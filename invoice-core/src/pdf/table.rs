use super::canvas::text_ops;
use super::fonts::{self, Font};
use super::graphics::{format_coord, Color, Rect};

// -------------------------------------------------------
// Public types
// -------------------------------------------------------

/// Result of trying to place content into a bounded area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitResult {
    /// The content was placed.
    Stop,
    /// The area already holds rows and has no room left; turn the page.
    BoxFull,
    /// Nothing was placed yet and the content still does not fit.
    BoxEmpty,
}

/// Horizontal alignment of text inside a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Width in points.
    pub width: f64,
    pub align: Align,
}

impl Column {
    pub fn new(width: f64, align: Align) -> Self {
        Column { width, align }
    }
}

/// Text and fill applied to every cell of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub font: Font,
    pub font_size: f64,
    pub text_color: Color,
    pub background: Option<Color>,
}

impl Default for RowStyle {
    fn default() -> Self {
        RowStyle {
            font: Font::Helvetica,
            font_size: 10.0,
            text_color: Color::gray(0.0),
            background: None,
        }
    }
}

/// A row of cell texts. Cells wrap; the row grows to the tallest cell.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<String>,
    pub style: RowStyle,
}

impl Row {
    pub fn new<S: Into<String>>(cells: impl IntoIterator<Item = S>, style: RowStyle) -> Self {
        Row {
            cells: cells.into_iter().map(Into::into).collect(),
            style,
        }
    }
}

/// Table layout: columns and border style. Rows are supplied one at a time
/// to [`PdfCanvas::fit_row`](super::PdfCanvas::fit_row).
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    /// Cell padding on all four sides, in points.
    pub padding: f64,
    pub border_color: Color,
    /// Border line width in points. `0.0` disables borders.
    pub border_width: f64,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Table {
            columns,
            padding: 4.0,
            border_color: Color::gray(0.8),
            border_width: 0.5,
        }
    }

    pub fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Height the row needs with its cells wrapped to their columns.
    pub fn row_height(&self, row: &Row) -> f64 {
        let style = &row.style;
        let lh = fonts::line_height(style.font_size);
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let text = row.cells.get(i).map(String::as_str).unwrap_or("");
                let avail = (col.width - 2.0 * self.padding).max(1.0);
                let lines = fonts::wrap(text, avail, style.font, style.font_size).len();
                lines as f64 * lh + 2.0 * self.padding
            })
            .fold(0.0_f64, f64::max)
    }

    /// Content ops for `row` if it fits under the cursor. Advances the cursor
    /// when placed.
    pub(crate) fn generate_row_ops(&self, row: &Row, cursor: &mut TableCursor) -> (Vec<u8>, FitResult) {
        let height = self.row_height(row);
        if cursor.current_y - height < cursor.rect.bottom() {
            let result = if cursor.first_row {
                FitResult::BoxEmpty
            } else {
                FitResult::BoxFull
            };
            return (Vec::new(), result);
        }
        (self.force_row_ops(row, cursor), FitResult::Stop)
    }

    /// Content ops for `row` placed under the cursor regardless of space.
    pub(crate) fn force_row_ops(&self, row: &Row, cursor: &mut TableCursor) -> Vec<u8> {
        let height = self.row_height(row);
        let top = cursor.current_y;
        let x = cursor.rect.x;
        let mut out = Vec::new();

        if let Some(bg) = row.style.background {
            out.extend_from_slice(bg.fill_op().as_bytes());
            out.extend_from_slice(
                format!(
                    "{} {} {} {} re\nf\n",
                    format_coord(x),
                    format_coord(top - height),
                    format_coord(self.width()),
                    format_coord(height)
                )
                .as_bytes(),
            );
        }

        let style = &row.style;
        let lh = fonts::line_height(style.font_size);
        let text_style = super::canvas::TextStyle {
            font: style.font,
            size: style.font_size,
            color: style.text_color,
        };
        let mut col_x = x;
        for (i, col) in self.columns.iter().enumerate() {
            let text = row.cells.get(i).map(String::as_str).unwrap_or("");
            let avail = (col.width - 2.0 * self.padding).max(1.0);
            let mut baseline = top - self.padding - style.font_size;
            for line in fonts::wrap(text, avail, style.font, style.font_size) {
                if !line.is_empty() {
                    let w = fonts::measure(&line, style.font, style.font_size);
                    let tx = match col.align {
                        Align::Left => col_x + self.padding,
                        Align::Center => col_x + (col.width - w) / 2.0,
                        Align::Right => col_x + col.width - self.padding - w,
                    };
                    out.extend_from_slice(&text_ops(&line, tx, baseline, &text_style));
                }
                baseline -= lh;
            }
            col_x += col.width;
        }

        if self.border_width > 0.0 {
            out.extend_from_slice(b"q\n");
            out.extend_from_slice(self.border_color.stroke_op().as_bytes());
            out.extend_from_slice(format!("{} w\n", format_coord(self.border_width)).as_bytes());
            out.extend_from_slice(
                format!(
                    "{} {} {} {} re\nS\n",
                    format_coord(x),
                    format_coord(top - height),
                    format_coord(self.width()),
                    format_coord(height)
                )
                .as_bytes(),
            );
            out.extend_from_slice(b"Q\n");
        }

        cursor.current_y -= height;
        cursor.first_row = false;
        out
    }
}

/// Tracks where the next row will be placed within a page.
///
/// Call `reset()` when starting a new page. `is_first_row()` detects a
/// fresh page so a header row can be repeated.
#[derive(Debug, Clone)]
pub struct TableCursor {
    pub(crate) rect: Rect,
    /// Top of the next row (PDF coordinates, from page bottom).
    pub(crate) current_y: f64,
    pub(crate) first_row: bool,
}

impl TableCursor {
    pub fn new(rect: &Rect) -> Self {
        TableCursor {
            rect: *rect,
            current_y: rect.y,
            first_row: true,
        }
    }

    pub fn reset(&mut self, rect: &Rect) {
        self.rect = *rect;
        self.current_y = rect.y;
        self.first_row = true;
    }

    pub fn is_first_row(&self) -> bool {
        self.first_row
    }

    /// Bottom edge of the last placed row, or the rect top if none.
    pub fn current_y(&self) -> f64 {
        self.current_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(vec![Column::new(100.0, Align::Left), Column::new(50.0, Align::Right)])
    }

    fn rect(height: f64) -> Rect {
        Rect {
            x: 10.0,
            y: 500.0,
            width: 150.0,
            height,
        }
    }

    #[test]
    fn single_line_row_height() {
        let row = Row::new(["a", "1"], RowStyle::default());
        assert!((table().row_height(&row) - (12.0 + 8.0)).abs() < 1e-9);
    }

    #[test]
    fn wrapped_cell_grows_row() {
        let long = "word ".repeat(30);
        let row = Row::new([long.as_str(), "1"], RowStyle::default());
        assert!(table().row_height(&row) > 40.0);
    }

    #[test]
    fn fit_advances_cursor() {
        let t = table();
        let mut cursor = TableCursor::new(&rect(100.0));
        let row = Row::new(["a", "1"], RowStyle::default());
        let (ops, result) = t.generate_row_ops(&row, &mut cursor);
        assert_eq!(result, FitResult::Stop);
        assert!(!ops.is_empty());
        assert!(!cursor.is_first_row());
        assert!((cursor.current_y() - 480.0).abs() < 1e-9);
    }

    #[test]
    fn full_and_empty_boxes() {
        let t = table();
        let row = Row::new(["a", "1"], RowStyle::default());

        let mut cursor = TableCursor::new(&rect(10.0));
        assert_eq!(t.generate_row_ops(&row, &mut cursor).1, FitResult::BoxEmpty);

        let mut cursor = TableCursor::new(&rect(30.0));
        assert_eq!(t.generate_row_ops(&row, &mut cursor).1, FitResult::Stop);
        assert_eq!(t.generate_row_ops(&row, &mut cursor).1, FitResult::BoxFull);
        cursor.reset(&rect(30.0));
        assert!(cursor.is_first_row());
        assert_eq!(cursor.current_y(), 500.0);
    }

    #[test]
    fn forced_row_ignores_space() {
        let t = table();
        let row = Row::new(["a", "1"], RowStyle::default());
        let mut cursor = TableCursor::new(&rect(5.0));
        let ops = t.force_row_ops(&row, &mut cursor);
        assert!(!ops.is_empty());
        assert!(cursor.current_y() < 495.0);
    }
}

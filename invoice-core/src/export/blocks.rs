//! Blocks drawn identically by every theme, styled through [`ThemeStyle`].
//!
//! [`ThemeStyle`]: super::ThemeStyle

use std::io::Write;

use tracing::warn;

use super::{Ctx, Cursor};
use crate::contract::{labels, DocumentView, PartyBlock, TotalKind};
use crate::error::ExportError;
use crate::pdf::fonts::{self, Font};
use crate::pdf::{Align, Column, FitResult, Rect, Row, RowStyle, Table, TableCursor, TextStyle};

const PANEL_PADDING: f64 = 8.0;
const PARTY_GUTTER: f64 = 20.0;
const TOTALS_WIDTH: f64 = 230.0;

/// Relative widths of the item table columns, in column order.
const ITEM_COLUMN_SHARES: [f64; 5] = [0.44, 0.10, 0.18, 0.10, 0.18];

/// Name, then wrapped detail lines. An empty name is left out.
fn party_lines(party: &PartyBlock, width: f64, font: Font, size: f64) -> (Option<String>, Vec<String>) {
    let name = (!party.name.trim().is_empty()).then(|| party.name.clone());
    let details = party
        .detail_lines()
        .into_iter()
        .flat_map(|line| fonts::wrap(line, width, font, size))
        .collect();
    (name, details)
}

/// Sender on the left, client on the right.
pub(super) fn parties<W: Write>(ctx: &mut Ctx<W>, view: &DocumentView, cursor: Cursor) -> Result<Cursor, ExportError> {
    let style = ctx.style;
    let size = style.body_size;
    let lh = fonts::line_height(size);
    let pad = if style.party_panels { PANEL_PADDING } else { 0.0 };
    let col_w = (ctx.content_width() - PARTY_GUTTER) / 2.0;
    let text_w = col_w - 2.0 * pad;

    let (sender_name, sender_lines) = party_lines(&view.sender, text_w, style.regular, size);
    let (client_name, client_lines) = party_lines(&view.client, text_w, style.regular, size);

    // The client column carries its heading line.
    let sender_rows = sender_name.iter().count() + sender_lines.len();
    let client_rows = 1 + client_name.iter().count() + client_lines.len();
    let height = sender_rows.max(client_rows) as f64 * lh + 2.0 * pad;

    let cursor = ctx.ensure_space(cursor, height)?;
    let left = ctx.left();
    let right_col = left + col_w + PARTY_GUTTER;
    if style.party_panels {
        let tint = ctx.palette.tint;
        ctx.fill(left, cursor.y, col_w, height, tint);
        ctx.fill(right_col, cursor.y, col_w, height, tint);
    }

    let bold = TextStyle::new(style.bold, size, ctx.palette.text);
    let regular = TextStyle::new(style.regular, size, ctx.palette.text);
    let heading = TextStyle::new(style.bold, size, ctx.palette.accent);

    let sender_column = sender_name
        .iter()
        .map(|name| (name.as_str(), &bold))
        .chain(sender_lines.iter().map(|line| (line.as_str(), &regular)));
    let client_column = std::iter::once((labels::CLIENT, &heading))
        .chain(client_name.iter().map(|name| (name.as_str(), &bold)))
        .chain(client_lines.iter().map(|line| (line.as_str(), &regular)));

    for (i, (text, text_style)) in sender_column.enumerate() {
        ctx.text(text, left + pad, cursor.y + pad + i as f64 * lh, text_style);
    }
    for (i, (text, text_style)) in client_column.enumerate() {
        ctx.text(text, right_col + pad, cursor.y + pad + i as f64 * lh, text_style);
    }

    Ok(cursor.advance(height))
}

fn item_table<W: Write>(ctx: &Ctx<W>) -> Table {
    let width = ctx.content_width();
    let aligns = [Align::Left, Align::Right, Align::Right, Align::Right, Align::Right];
    let columns = ITEM_COLUMN_SHARES
        .iter()
        .zip(aligns)
        .map(|(share, align)| Column::new(width * share, align))
        .collect();
    let mut table = Table::new(columns);
    table.border_color = ctx.style.border;
    table
}

/// Table area from `cursor` down to the bottom margin, in PDF space.
fn table_area<W: Write>(ctx: &Ctx<W>, cursor: Cursor) -> Rect {
    let top = ctx.pdf_y(cursor.y);
    Rect {
        x: ctx.left(),
        y: top,
        width: ctx.content_width(),
        height: (top - ctx.margin()).max(0.0),
    }
}

fn place_header<W: Write>(ctx: &mut Ctx<W>, table: &Table, header: &Row, tc: &mut TableCursor) {
    if ctx.canvas.fit_row(table, header, tc) != FitResult::Stop {
        ctx.canvas.place_row(table, header, tc);
    }
}

/// The item table. Rows that do not fit continue on a new page under a
/// repeated header row. Returns the cursor just below the last row drawn.
pub(super) fn items<W: Write>(ctx: &mut Ctx<W>, view: &DocumentView, cursor: Cursor) -> Result<Cursor, ExportError> {
    let style = ctx.style;
    let table = item_table(ctx);
    let header = Row::new(
        labels::ITEM_COLUMNS,
        RowStyle {
            font: style.bold,
            font_size: style.table_size,
            text_color: style.table_header_text,
            background: Some(style.table_header),
        },
    );
    let rows: Vec<Row> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Row::new(
                item.cells(),
                RowStyle {
                    font: style.regular,
                    font_size: style.table_size,
                    text_color: ctx.palette.text,
                    background: if i % 2 == 1 { style.stripe } else { None },
                },
            )
        })
        .collect();

    // Keep the header with at least the first row.
    let lead = table.row_height(&header) + rows.first().map(|r| table.row_height(r)).unwrap_or(0.0);
    let mut cursor = ctx.ensure_space(cursor, lead)?;
    let mut tc = TableCursor::new(&table_area(ctx, cursor));
    place_header(ctx, &table, &header, &mut tc);

    let mut rows_on_page = 0;
    for row in &rows {
        loop {
            match ctx.canvas.fit_row(&table, row, &mut tc) {
                FitResult::Stop => {
                    rows_on_page += 1;
                    break;
                }
                FitResult::BoxFull if rows_on_page > 0 => {
                    cursor = ctx.page_break(cursor)?;
                    tc.reset(&table_area(ctx, cursor));
                    place_header(ctx, &table, &header, &mut tc);
                    rows_on_page = 0;
                }
                _ => {
                    warn!("item row taller than a page, drawing it past the bottom margin");
                    ctx.canvas.place_row(&table, row, &mut tc);
                    rows_on_page += 1;
                    break;
                }
            }
        }
    }

    Ok(Cursor::new(cursor.page, ctx.pdf_y(tc.current_y())))
}

/// Right-aligned HT / TVA / TTC lines, then the exemption notice if any.
pub(super) fn totals<W: Write>(ctx: &mut Ctx<W>, view: &DocumentView, cursor: Cursor) -> Result<Cursor, ExportError> {
    let style = ctx.style;
    let display = &view.totals_display;
    let size = style.body_size;
    let row_h = fonts::line_height(size) + 4.0;
    let notice_h = if display.exemption_notice.is_some() {
        fonts::line_height(size) + 4.0
    } else {
        0.0
    };
    let height = display.lines.len() as f64 * row_h + notice_h;

    let cursor = ctx.ensure_space(cursor, height)?;
    let right = ctx.right();
    let x = right - TOTALS_WIDTH;

    let regular = TextStyle::new(style.regular, size, ctx.palette.text);
    let strong = TextStyle::new(style.bold, size + 1.0, ctx.palette.accent);

    let mut y = cursor.y;
    for line in &display.lines {
        let text_style = if line.kind == TotalKind::Ttc {
            let ttc_rule = ctx.palette.accent;
            let py = ctx.pdf_y(y);
            ctx.canvas.stroke_line((x, py), (right, py), ttc_rule, 0.75);
            &strong
        } else {
            &regular
        };
        ctx.text(line.label, x + 4.0, y + 2.0, text_style);
        ctx.text_right(&line.amount, right - 4.0, y + 2.0, text_style);
        y += row_h;
    }

    if let Some(notice) = display.exemption_notice {
        let muted = TextStyle::new(style.italic, size, ctx.palette.muted);
        ctx.text_right(notice, right - 4.0, y + 2.0, &muted);
        y += notice_h;
    }

    Ok(Cursor::new(cursor.page, y))
}

/// A wrapped text block with an optional heading. Kept on one page when it
/// fits on one; otherwise it flows line by line.
pub(super) fn paragraph<W: Write>(
    ctx: &mut Ctx<W>,
    heading: Option<&str>,
    body: &str,
    cursor: Cursor,
) -> Result<Cursor, ExportError> {
    let style = ctx.style;
    let size = style.body_size;
    let lh = fonts::line_height(size);
    let body_style = if heading.is_some() {
        TextStyle::new(style.regular, size, ctx.palette.text)
    } else {
        TextStyle::new(style.italic, size, ctx.palette.muted)
    };
    let lines = fonts::wrap(body, ctx.content_width(), body_style.font, size);
    let heading_h = if heading.is_some() { lh + 2.0 } else { 0.0 };
    let total = heading_h + lines.len() as f64 * lh;

    let usable = ctx.bottom() - ctx.margin();
    let needed = if total <= usable { total } else { heading_h + lh };
    let mut cursor = ctx.ensure_space(cursor, needed)?;

    if let Some(heading) = heading {
        let heading_style = TextStyle::new(style.bold, size, ctx.palette.accent);
        let left = ctx.left();
        ctx.text(heading, left, cursor.y, &heading_style);
        cursor = cursor.advance(heading_h);
    }
    let left = ctx.left();
    ctx.lines(&lines, left, cursor, &body_style)
}

/// Number line, issue date and, for invoices, due date.
pub(super) fn document_meta(view: &DocumentView) -> Vec<String> {
    let mut lines = vec![view.number_line(), view.issue_date_line()];
    lines.extend(view.due_date_line());
    lines
}

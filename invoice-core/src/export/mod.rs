//! PDF export, one visual variant per [`Theme`].
//!
//! Every variant draws the same [`DocumentView`] blocks in the same order:
//! header, parties, item table, totals, payment terms, notes. Positions come
//! from an explicit [`Cursor`] that each draw step takes and returns; the
//! cursor never moves backwards. The resulting [`Layout`] records where each
//! block started and ended.

mod blocks;
mod classic;
mod dark;
mod elegant;
mod modern;

use std::io::Write;

use tracing::{debug, info, warn};

use crate::config::ExportSettings;
use crate::contract::DocumentView;
use crate::error::ExportError;
use crate::model::Document;
use crate::pdf::{fonts, images, Color, Font, ImageId, PdfCanvas, Rect, TextStyle};
use crate::theme::{Palette, Theme};

/// Vertical gap left after each block.
pub const BLOCK_GAP: f64 = 10.0;

/// Next free vertical position: a page index and a distance from the top
/// edge of that page, in points.
///
/// Ordering is page first, then `y`, so `a <= b` means `a` is not below `b`
/// in reading order.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Cursor {
    /// Zero-based page index.
    pub page: usize,
    /// Distance from the top of the page.
    pub y: f64,
}

impl Cursor {
    pub fn new(page: usize, y: f64) -> Self {
        Cursor { page, y }
    }

    /// Move down by `dy` on the same page.
    pub fn advance(self, dy: f64) -> Self {
        Cursor {
            page: self.page,
            y: self.y + dy.max(0.0),
        }
    }
}

/// A drawn section of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Header,
    Parties,
    Items,
    Totals,
    PaymentTerms,
    Notes,
}

/// Where a block was drawn: `start` is the cursor it received, `end` the
/// cursor it returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub block: Block,
    pub start: Cursor,
    pub end: Cursor,
}

/// Block placements in drawing order, and the final page count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub pages: usize,
}

impl Layout {
    pub fn get(&self, block: Block) -> Option<&Placement> {
        self.placements.iter().find(|p| p.block == block)
    }
}

/// A finished export, ready to be handed to the host as a download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    /// `Facture_<number>.pdf` or `Devis_<number>.pdf`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub layout: Layout,
}

/// Export `doc` with the given theme.
pub fn export(doc: &Document, theme: Theme, settings: &ExportSettings) -> Result<ExportedFile, ExportError> {
    export_view(&DocumentView::build(doc), theme, settings)
}

/// Export an already built view.
pub fn export_view(view: &DocumentView, theme: Theme, settings: &ExportSettings) -> Result<ExportedFile, ExportError> {
    let (bytes, layout) = export_to(view, theme, settings, Vec::new())?;
    info!(
        file = %view.file_name,
        theme = %theme,
        pages = layout.pages,
        bytes = bytes.len(),
        "exported document"
    );
    Ok(ExportedFile {
        file_name: view.file_name.clone(),
        bytes,
        layout,
    })
}

/// Write the PDF for `view` into `sink` and return the sink with the layout.
pub fn export_to<W: Write>(
    view: &DocumentView,
    theme: Theme,
    settings: &ExportSettings,
    sink: W,
) -> Result<(W, Layout), ExportError> {
    let mut canvas = PdfCanvas::new(sink, settings.page_width, settings.page_height, settings.compress)?;
    canvas
        .set_info("Title", &format!("{} {}", view.title, view.number))
        .set_info("Creator", &settings.creator);

    let mut ctx = Ctx::new(canvas, settings, theme);
    ctx.load_logo(view)?;

    let mut cursor = Cursor::new(0, settings.margin);
    cursor = ctx.block(Block::Header, cursor, |ctx, c| match theme {
        Theme::Classic => classic::masthead(ctx, view, c),
        Theme::Modern => modern::masthead(ctx, view, c),
        Theme::Elegant => elegant::masthead(ctx, view, c),
        Theme::Dark => dark::masthead(ctx, view, c),
    })?;
    cursor = ctx.block(Block::Parties, cursor, |ctx, c| blocks::parties(ctx, view, c))?;
    cursor = ctx.block(Block::Items, cursor, |ctx, c| blocks::items(ctx, view, c))?;
    cursor = ctx.block(Block::Totals, cursor, |ctx, c| blocks::totals(ctx, view, c))?;
    if let Some(terms) = &view.payment_terms {
        cursor = ctx.block(Block::PaymentTerms, cursor, |ctx, c| {
            blocks::paragraph(ctx, Some(crate::contract::labels::PAYMENT_TERMS), terms, c)
        })?;
    }
    if let Some(notes) = &view.notes {
        ctx.block(Block::Notes, cursor, |ctx, c| blocks::paragraph(ctx, None, notes, c))?;
    }

    let layout = Layout {
        pages: ctx.canvas.page_count(),
        placements: ctx.placements,
    };
    Ok((ctx.canvas.finish()?, layout))
}

/// Fonts, sizes and fills that distinguish one theme's PDF from another.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ThemeStyle {
    pub regular: Font,
    pub bold: Font,
    pub italic: Font,
    pub body_size: f64,
    pub table_size: f64,
    /// Fill behind the whole page, repeated on every page.
    pub page_background: Option<Color>,
    /// Background of the item table header row.
    pub table_header: Color,
    pub table_header_text: Color,
    /// Fill for every other item row.
    pub stripe: Option<Color>,
    pub border: Color,
    /// Draw party blocks on a tinted panel.
    pub party_panels: bool,
}

impl ThemeStyle {
    fn for_theme(theme: Theme, palette: &Palette) -> Self {
        match theme {
            Theme::Classic => classic::style(palette),
            Theme::Modern => modern::style(palette),
            Theme::Elegant => elegant::style(palette),
            Theme::Dark => dark::style(palette),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Logo {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

/// Drawing state shared by the block drawers. Coordinates passed in are
/// top-down (distance from the page top); conversion to PDF space happens
/// here.
pub(crate) struct Ctx<'a, W: Write> {
    pub canvas: PdfCanvas<W>,
    pub settings: &'a ExportSettings,
    pub palette: Palette,
    pub style: ThemeStyle,
    pub logo: Option<Logo>,
    placements: Vec<Placement>,
}

impl<'a, W: Write> Ctx<'a, W> {
    fn new(canvas: PdfCanvas<W>, settings: &'a ExportSettings, theme: Theme) -> Self {
        let palette = theme.palette();
        let mut ctx = Ctx {
            canvas,
            settings,
            palette,
            style: ThemeStyle::for_theme(theme, &palette),
            logo: None,
            placements: Vec::new(),
        };
        ctx.paint_page();
        ctx
    }

    /// Decode and embed the logo. Undecodable logos are skipped.
    fn load_logo(&mut self, view: &DocumentView) -> Result<(), ExportError> {
        let Some(uri) = view.logo.as_deref() else {
            return Ok(());
        };
        match images::load_data_uri(uri) {
            Ok(image) => {
                let id = self.canvas.add_image(&image)?;
                self.logo = Some(Logo {
                    id,
                    width: image.width,
                    height: image.height,
                });
            }
            Err(err) => warn!(error = %err, "logo could not be decoded, exporting without it"),
        }
        Ok(())
    }

    fn block<F>(&mut self, block: Block, start: Cursor, draw: F) -> Result<Cursor, ExportError>
    where
        F: FnOnce(&mut Self, Cursor) -> Result<Cursor, ExportError>,
    {
        let end = draw(self, start)?;
        debug!(?block, page = end.page, y = end.y, "block drawn");
        self.placements.push(Placement { block, start, end });
        Ok(end.advance(BLOCK_GAP))
    }

    fn paint_page(&mut self) {
        if let Some(bg) = self.style.page_background {
            let rect = Rect {
                x: 0.0,
                y: self.canvas.page_height(),
                width: self.canvas.page_width(),
                height: self.canvas.page_height(),
            };
            self.canvas.fill_rect(rect, bg);
        }
    }

    pub fn margin(&self) -> f64 {
        self.settings.margin
    }

    pub fn left(&self) -> f64 {
        self.settings.margin
    }

    pub fn right(&self) -> f64 {
        self.canvas.page_width() - self.settings.margin
    }

    pub fn content_width(&self) -> f64 {
        self.right() - self.left()
    }

    /// Lowest usable top-down position on a page.
    pub fn bottom(&self) -> f64 {
        self.canvas.page_height() - self.settings.margin
    }

    /// Convert a top-down position to PDF space.
    pub fn pdf_y(&self, y: f64) -> f64 {
        self.canvas.page_height() - y
    }

    /// Start a new page and return the cursor at its top margin.
    pub fn page_break(&mut self, cursor: Cursor) -> Result<Cursor, ExportError> {
        self.canvas.new_page()?;
        self.paint_page();
        let next = Cursor::new(cursor.page + 1, self.margin());
        debug!(page = next.page, "page break");
        Ok(next)
    }

    /// Break the page unless `height` fits below `cursor`. A cursor already at
    /// the top of a page is returned as is.
    pub fn ensure_space(&mut self, cursor: Cursor, height: f64) -> Result<Cursor, ExportError> {
        let at_top = cursor.y <= self.margin() + f64::EPSILON;
        if cursor.y + height > self.bottom() && !at_top {
            return self.page_break(cursor);
        }
        Ok(cursor)
    }

    /// Draw a line of text whose box starts at top-down `y`.
    pub fn text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        let baseline = self.pdf_y(y + style.size);
        self.canvas.text(text, x, baseline, style);
    }

    pub fn text_right(&mut self, text: &str, right: f64, y: f64, style: &TextStyle) {
        let baseline = self.pdf_y(y + style.size);
        self.canvas.text_right(text, right, baseline, style);
    }

    pub fn text_centered(&mut self, text: &str, center: f64, y: f64, style: &TextStyle) {
        let baseline = self.pdf_y(y + style.size);
        self.canvas.text_centered(text, center, baseline, style);
    }

    /// Fill a band whose top edge is at top-down `y`.
    pub fn fill(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let rect = Rect {
            x,
            y: self.pdf_y(y),
            width,
            height,
        };
        self.canvas.fill_rect(rect, color);
    }

    /// Horizontal rule across the content width at top-down `y`.
    pub fn rule(&mut self, y: f64, color: Color, width: f64) {
        let py = self.pdf_y(y);
        let (l, r) = (self.left(), self.right());
        self.canvas.stroke_line((l, py), (r, py), color, width);
    }

    /// Draw the logo scaled into `max_w` x `max_h` with its top-left corner
    /// at (`x`, `y`). Returns the drawn size, or `(0, 0)` without a logo.
    pub fn draw_logo(&mut self, x: f64, y: f64, max_w: f64, max_h: f64) -> (f64, f64) {
        let Some(logo) = self.logo else {
            return (0.0, 0.0);
        };
        let (w, h) = images::fit_within(logo.width, logo.height, max_w, max_h);
        let bottom = self.pdf_y(y + h);
        self.canvas.draw_image(logo.id, x, bottom, w, h);
        (w, h)
    }

    /// Draw `lines` top to bottom from `cursor`, breaking pages between
    /// lines as needed.
    pub fn lines(&mut self, lines: &[String], x: f64, cursor: Cursor, style: &TextStyle) -> Result<Cursor, ExportError> {
        let lh = fonts::line_height(style.size);
        let mut cursor = cursor;
        for line in lines {
            cursor = self.ensure_space(cursor, lh)?;
            self.text(line, x, cursor.y, style);
            cursor = cursor.advance(lh);
        }
        Ok(cursor)
    }
}

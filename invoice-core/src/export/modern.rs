//! Teal band across the top with the title in white, green accents below.

use std::io::Write;

use super::blocks::document_meta;
use super::{Ctx, Cursor, ThemeStyle};
use crate::contract::DocumentView;
use crate::error::ExportError;
use crate::pdf::fonts::{self, Font};
use crate::pdf::TextStyle;
use crate::theme::Palette;

/// Band height: 30 mm.
const BAND_HEIGHT: f64 = 85.0;
const TITLE_SIZE: f64 = 18.0;

pub(super) fn style(palette: &Palette) -> ThemeStyle {
    ThemeStyle {
        regular: Font::Helvetica,
        bold: Font::HelveticaBold,
        italic: Font::HelveticaOblique,
        body_size: 10.0,
        table_size: 9.0,
        page_background: None,
        table_header: palette.accent,
        table_header_text: palette.header_text,
        stripe: Some(palette.tint),
        border: palette.accent,
        party_panels: true,
    }
}

pub(super) fn masthead<W: Write>(ctx: &mut Ctx<W>, view: &DocumentView, cursor: Cursor) -> Result<Cursor, ExportError> {
    let page_w = ctx.canvas.page_width();
    let accent = ctx.palette.accent;
    ctx.fill(0.0, 0.0, page_w, BAND_HEIGHT, accent);

    let left = ctx.left();
    let right = ctx.right();
    let on_band = TextStyle::new(ctx.style.bold, TITLE_SIZE, ctx.palette.header_text);
    let band_small = TextStyle::new(ctx.style.regular, ctx.style.body_size, ctx.palette.header_text);

    let title_y = (BAND_HEIGHT - fonts::line_height(TITLE_SIZE) - fonts::line_height(band_small.size)) / 2.0;
    ctx.text(view.title, left, title_y, &on_band);
    ctx.text(
        &view.number_line(),
        left,
        title_y + fonts::line_height(TITLE_SIZE),
        &band_small,
    );
    ctx.draw_logo(right - 100.0, (BAND_HEIGHT - 57.0) / 2.0, 100.0, 57.0);

    let mut y = cursor.y.max(BAND_HEIGHT + 12.0);
    let dates = TextStyle::new(ctx.style.regular, ctx.style.body_size, ctx.palette.muted);
    let lh = fonts::line_height(dates.size);
    // The number already sits in the band.
    for line in document_meta(view).iter().skip(1) {
        ctx.text_right(line, right, y, &dates);
        y += lh;
    }

    let rule = ctx.palette.accent_alt;
    ctx.rule(y + 4.0, rule, 1.5);
    Ok(Cursor::new(cursor.page, y + 8.0))
}

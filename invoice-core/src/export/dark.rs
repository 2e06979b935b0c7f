//! Indigo page, light blue title, royal blue table header.

use std::io::Write;

use super::blocks::document_meta;
use super::{Ctx, Cursor, ThemeStyle};
use crate::contract::DocumentView;
use crate::error::ExportError;
use crate::pdf::fonts::{self, Font};
use crate::pdf::TextStyle;
use crate::theme::Palette;

const TITLE_SIZE: f64 = 24.0;

pub(super) fn style(palette: &Palette) -> ThemeStyle {
    ThemeStyle {
        regular: Font::Helvetica,
        bold: Font::HelveticaBold,
        italic: Font::HelveticaOblique,
        body_size: 9.0,
        table_size: 9.0,
        page_background: Some(palette.page),
        table_header: palette.accent,
        table_header_text: palette.header_text,
        stripe: Some(palette.tint),
        border: palette.accent,
        party_panels: true,
    }
}

pub(super) fn masthead<W: Write>(ctx: &mut Ctx<W>, view: &DocumentView, cursor: Cursor) -> Result<Cursor, ExportError> {
    let left = ctx.left();
    let right = ctx.right();
    let mut y = cursor.y;
    let (_, logo_h) = ctx.draw_logo(left, y, 100.0, 57.0);
    if logo_h > 0.0 {
        y += logo_h + 8.0;
    }

    let title = TextStyle::new(ctx.style.bold, TITLE_SIZE, ctx.palette.accent_alt);
    ctx.text(view.title, left, y, &title);

    // Meta lines sit right-aligned beside the title.
    let meta = TextStyle::new(ctx.style.regular, ctx.style.body_size, ctx.palette.muted);
    let lh = fonts::line_height(meta.size);
    let mut meta_y = y;
    for line in document_meta(view) {
        ctx.text_right(&line, right, meta_y, &meta);
        meta_y += lh;
    }

    let y = (y + fonts::line_height(TITLE_SIZE)).max(meta_y) + 6.0;
    let rule = ctx.palette.accent;
    ctx.rule(y, rule, 1.0);
    Ok(Cursor::new(cursor.page, y + 6.0))
}

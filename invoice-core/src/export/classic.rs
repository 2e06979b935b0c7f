//! Purple title on white, pink rule, client details on a lilac panel.

use std::io::Write;

use super::blocks::document_meta;
use super::{Ctx, Cursor, ThemeStyle};
use crate::contract::DocumentView;
use crate::error::ExportError;
use crate::pdf::fonts::{self, Font};
use crate::pdf::TextStyle;
use crate::theme::Palette;

const TITLE_SIZE: f64 = 24.0;
const CORNER: f64 = 60.0;

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
        border: palette.tint,
        party_panels: true,
    }
}

pub(super) fn masthead<W: Write>(ctx: &mut Ctx<W>, view: &DocumentView, cursor: Cursor) -> Result<Cursor, ExportError> {
    let page_w = ctx.canvas.page_width();
    let tint = ctx.palette.tint;
    ctx.fill(page_w - CORNER, 0.0, CORNER, CORNER, tint);

    let left = ctx.left();
    let mut y = cursor.y;
    let (_, logo_h) = ctx.draw_logo(left, y, 113.0, 57.0);
    if logo_h > 0.0 {
        y += logo_h + 10.0;
    }

    let title = TextStyle::new(ctx.style.bold, TITLE_SIZE, ctx.palette.accent);
    ctx.text(view.title, left, y, &title);
    y += fonts::line_height(TITLE_SIZE);

    let muted = TextStyle::new(ctx.style.regular, ctx.style.body_size, ctx.palette.muted);
    let lh = fonts::line_height(muted.size);
    for line in document_meta(view) {
        ctx.text(&line, left, y, &muted);
        y += lh;
    }

    y += 6.0;
    let rule = ctx.palette.accent_alt;
    ctx.rule(y, rule, 1.0);
    Ok(Cursor::new(cursor.page, y + 4.0))
}

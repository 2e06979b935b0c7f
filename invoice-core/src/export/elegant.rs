//! Amber and orange header stripe, centered serif title.

use std::io::Write;

use super::blocks::document_meta;
use super::{Ctx, Cursor, ThemeStyle};
use crate::contract::DocumentView;
use crate::error::ExportError;
use crate::pdf::fonts::{self, Font};
use crate::pdf::TextStyle;
use crate::theme::Palette;

/// Stripe height: 25 mm.
const STRIPE_HEIGHT: f64 = 71.0;
const TITLE_SIZE: f64 = 24.0;

pub(super) fn style(palette: &Palette) -> ThemeStyle {
    ThemeStyle {
        regular: Font::TimesRoman,
        bold: Font::TimesBold,
        italic: Font::TimesItalic,
        body_size: 10.5,
        table_size: 9.5,
        page_background: None,
        table_header: palette.accent_alt,
        table_header_text: palette.page,
        stripe: Some(palette.tint),
        border: palette.accent,
        party_panels: false,
    }
}

pub(super) fn masthead<W: Write>(ctx: &mut Ctx<W>, view: &DocumentView, cursor: Cursor) -> Result<Cursor, ExportError> {
    let page_w = ctx.canvas.page_width();
    let (amber, orange) = (ctx.palette.accent, ctx.palette.accent_alt);
    ctx.fill(0.0, 0.0, page_w, STRIPE_HEIGHT, amber);
    ctx.fill(page_w / 2.0, 0.0, page_w / 2.0, STRIPE_HEIGHT, orange);

    let center = page_w / 2.0;
    let mut y = cursor.y.max(STRIPE_HEIGHT + 12.0);
    let (_, logo_h) = ctx.draw_logo(ctx.left(), y, 100.0, 57.0);

    let title = TextStyle::new(ctx.style.bold, TITLE_SIZE, orange);
    ctx.text_centered(view.title, center, y, &title);
    y += fonts::line_height(TITLE_SIZE);

    let muted = TextStyle::new(ctx.style.italic, ctx.style.body_size, ctx.palette.muted);
    let lh = fonts::line_height(muted.size);
    for line in document_meta(view) {
        ctx.text_centered(&line, center, y, &muted);
        y += lh;
    }

    let below_logo = cursor.y.max(STRIPE_HEIGHT + 12.0) + logo_h;
    let y = y.max(below_logo) + 6.0;
    ctx.rule(y, amber, 0.75);
    ctx.rule(y + 3.0, amber, 0.75);
    Ok(Cursor::new(cursor.page, y + 8.0))
}

//! Indigo page, light blue title, meta block on the right.

use super::blocks::{logo, meta};
use super::{css, Element, Look};
use crate::contract::DocumentView;
use crate::theme::Palette;

pub(super) fn look(palette: &Palette) -> Look {
    Look {
        palette: *palette,
        font_family: "Helvetica, Arial, sans-serif",
        panel: Some(palette.tint),
        table_header: palette.accent,
        table_header_text: palette.header_text,
        stripe: Some(palette.tint),
    }
}

pub(super) fn header(view: &DocumentView, look: &Look) -> Element {
    let p = &look.palette;
    Element::new("header")
        .attr("data-block", "header")
        .style(format!(
            "display:flex;justify-content:space-between;border-bottom:1px solid {};padding-bottom:12px",
            css(p.accent)
        ))
        .child(
            Element::new("div").child_opt(logo(view, 56)).child(
                Element::new("h1")
                    .style(format!("color:{};margin:8px 0", css(p.accent_alt)))
                    .text(view.title),
            ),
        )
        .child(
            Element::new("div")
                .style(format!("text-align:right;color:{}", css(p.muted)))
                .children(meta(view)),
        )
}

//! Purple title, pink underline, lilac panels.

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
        .style(format!("border-bottom:2px solid {};padding-bottom:12px", css(p.accent_alt)))
        .child_opt(logo(view, 64))
        .child(
            Element::new("h1")
                .style(format!("color:{};font-size:32px;margin:8px 0", css(p.accent)))
                .text(view.title),
        )
        .child(
            Element::new("div")
                .style(format!("color:{}", css(p.muted)))
                .children(meta(view)),
        )
}

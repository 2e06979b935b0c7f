//! Amber and orange stripe, centered serif title between double rules.

use super::blocks::{logo, meta};
use super::{css, Element, Look};
use crate::contract::DocumentView;
use crate::theme::Palette;

pub(super) fn look(palette: &Palette) -> Look {
    Look {
        palette: *palette,
        font_family: "Georgia, 'Times New Roman', serif",
        panel: None,
        table_header: palette.accent_alt,
        table_header_text: palette.page,
        stripe: Some(palette.tint),
    }
}

pub(super) fn header(view: &DocumentView, look: &Look) -> Element {
    let p = &look.palette;
    Element::new("header")
        .attr("data-block", "header")
        .style(format!(
            "text-align:center;border-bottom:4px double {};padding-bottom:12px",
            css(p.accent)
        ))
        .child(Element::new("div").style(format!(
            "height:12px;background:linear-gradient(90deg,{} 50%,{} 50%)",
            css(p.accent),
            css(p.accent_alt)
        )))
        .child_opt(logo(view, 60))
        .child(
            Element::new("h1")
                .style(format!("color:{};letter-spacing:4px", css(p.accent_alt)))
                .text(view.title),
        )
        .child(
            Element::new("div")
                .style(format!("font-style:italic;color:{}", css(p.muted)))
                .children(meta(view)),
        )
}

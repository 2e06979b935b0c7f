//! Teal title band, dates aligned right below it.

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
    let mut lines = meta(view).into_iter();
    let number = lines.next();

    let band = Element::new("div")
        .style(format!(
            "background:{};color:{};display:flex;justify-content:space-between;align-items:center;padding:16px 24px",
            css(p.accent),
            css(p.header_text)
        ))
        .child(
            Element::new("div")
                .child(Element::new("h1").style("margin:0;font-size:26px").text(view.title))
                .child_opt(number),
        )
        .child_opt(logo(view, 56));

    Element::new("header")
        .attr("data-block", "header")
        .style(format!("border-bottom:3px solid {}", css(p.accent_alt)))
        .child(band)
        .child(
            Element::new("div")
                .style(format!("text-align:right;color:{};padding:8px 0", css(p.muted)))
                .children(lines),
        )
}

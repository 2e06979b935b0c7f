//! On-screen preview, one visual variant per [`Theme`].
//!
//! A preview is a small element tree ([`Node`]) the host mounts as HTML.
//! Blocks and figures carry `data-*` attributes (`data-block`,
//! `data-field`, `data-total`, `data-notice`) so hosts and tests can find
//! them without depending on theme markup.

mod blocks;
mod classic;
mod dark;
mod elegant;
mod modern;
mod node;

pub use node::{Element, Node};

use crate::contract::DocumentView;
use crate::model::Document;
use crate::pdf::Color;
use crate::theme::{Palette, Theme};

/// Render `doc` with the given theme.
pub fn render(doc: &Document, theme: Theme) -> Node {
    render_view(&DocumentView::build(doc), theme)
}

/// Render an already built view.
pub fn render_view(view: &DocumentView, theme: Theme) -> Node {
    let palette = theme.palette();
    let look = match theme {
        Theme::Classic => classic::look(&palette),
        Theme::Modern => modern::look(&palette),
        Theme::Elegant => elegant::look(&palette),
        Theme::Dark => dark::look(&palette),
    };
    let header = match theme {
        Theme::Classic => classic::header(view, &look),
        Theme::Modern => modern::header(view, &look),
        Theme::Elegant => elegant::header(view, &look),
        Theme::Dark => dark::header(view, &look),
    };

    Element::new("div")
        .class(&format!("invoice invoice-{}", theme.id()))
        .attr("data-theme", theme.id())
        .style(format!(
            "font-family:{};background:{};color:{};padding:32px",
            look.font_family,
            css(look.palette.page),
            css(look.palette.text)
        ))
        .child(header)
        .child(blocks::parties(view, &look))
        .child(blocks::items(view, &look))
        .child(blocks::totals(view, &look))
        .child_opt(blocks::payment_terms(view, &look))
        .child_opt(blocks::notes(view, &look))
        .into()
}

/// Presentation choices of one preview variant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Look {
    pub palette: Palette,
    pub font_family: &'static str,
    /// Fill behind the party blocks, if any.
    pub panel: Option<Color>,
    pub table_header: Color,
    pub table_header_text: Color,
    /// Fill for every other item row.
    pub stripe: Option<Color>,
}

pub(crate) fn css(color: Color) -> String {
    color.to_hex()
}

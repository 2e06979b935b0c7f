//! Preview blocks every theme shares, colored through [`Look`].

use super::{css, Element, Look};
use crate::contract::{labels, DocumentView, PartyBlock, TotalKind};

fn party(block: &PartyBlock, heading: Option<&str>, look: &Look, field: &'static str) -> Element {
    let mut el = Element::new("div").attr("data-field", field).class("party");
    if let Some(panel) = look.panel {
        el = el.style(format!("background:{};padding:12px;border-radius:6px", css(panel)));
    }
    el.child_opt(heading.map(|h| {
        Element::new("h3")
            .style(format!("color:{};margin:0 0 4px", css(look.palette.accent)))
            .text(h)
    }))
    .child_opt((!block.name.trim().is_empty()).then(|| Element::new("p").class("party-name").text(&block.name)))
    .children(
        block
            .address_lines
            .iter()
            .map(|line| Element::new("p").class("address").text(line)),
    )
    .child_opt(block.identifier.as_ref().map(|id| Element::new("p").text(id)))
    .child_opt(block.email.as_ref().map(|email| Element::new("p").text(email)))
    .child_opt(block.phone.as_ref().map(|phone| Element::new("p").text(phone)))
}

pub(super) fn parties(view: &DocumentView, look: &Look) -> Element {
    Element::new("section")
        .attr("data-block", "parties")
        .style("display:flex;gap:24px;justify-content:space-between;margin:24px 0")
        .child(party(&view.sender, None, look, "sender"))
        .child(party(&view.client, Some(labels::CLIENT), look, "client"))
}

pub(super) fn items(view: &DocumentView, look: &Look) -> Element {
    let head_style = format!(
        "background:{};color:{};text-align:left;padding:6px",
        css(look.table_header),
        css(look.table_header_text)
    );
    let header = Element::new("tr").children(
        labels::ITEM_COLUMNS
            .iter()
            .map(|label| Element::new("th").style(head_style.as_str()).text(*label)),
    );

    let rows = view.rows.iter().enumerate().map(|(i, row)| {
        let mut tr = Element::new("tr").attr("data-row", i.to_string());
        if let (1, Some(stripe)) = (i % 2, look.stripe) {
            tr = tr.style(format!("background:{}", css(stripe)));
        }
        tr.children(row.cells().into_iter().enumerate().map(|(col, cell)| {
            let align = if col == 0 { "left" } else { "right" };
            Element::new("td")
                .style(format!("text-align:{};padding:6px", align))
                .text(cell)
        }))
    });

    Element::new("section").attr("data-block", "items").child(
        Element::new("table")
            .style("width:100%;border-collapse:collapse")
            .child(Element::new("thead").child(header))
            .child(Element::new("tbody").children(rows)),
    )
}

fn total_key(kind: TotalKind) -> &'static str {
    match kind {
        TotalKind::Ht => "ht",
        TotalKind::Tva => "tva",
        TotalKind::Ttc => "ttc",
    }
}

pub(super) fn totals(view: &DocumentView, look: &Look) -> Element {
    let display = &view.totals_display;
    let lines = display.lines.iter().map(|line| {
        let mut style = "display:flex;justify-content:space-between;gap:16px".to_string();
        if line.kind == TotalKind::Ttc {
            style.push_str(&format!(";font-weight:bold;color:{}", css(look.palette.accent)));
        }
        let row = Element::new("div")
            .attr("data-total", total_key(line.kind))
            .style(style);
        row.child(Element::new("span").text(line.label))
            .child(Element::new("span").class("amount").text(&line.amount))
    });

    Element::new("section")
        .attr("data-block", "totals")
        .style("margin-left:auto;width:280px;margin-top:16px")
        .children(lines)
        .child_opt(display.exemption_notice.map(|notice| {
            Element::new("p")
                .attr("data-notice", "tax-exemption")
                .style(format!("font-style:italic;color:{}", css(look.palette.muted)))
                .text(notice)
        }))
}

pub(super) fn payment_terms(view: &DocumentView, look: &Look) -> Option<Element> {
    view.payment_terms.as_ref().map(|terms| {
        Element::new("section")
            .attr("data-block", "payment-terms")
            .child(
                Element::new("h3")
                    .style(format!("color:{}", css(look.palette.accent)))
                    .text(labels::PAYMENT_TERMS),
            )
            .child(Element::new("p").style("white-space:pre-line").text(terms))
    })
}

pub(super) fn notes(view: &DocumentView, look: &Look) -> Option<Element> {
    view.notes.as_ref().map(|notes| {
        Element::new("section")
            .attr("data-block", "notes")
            .style(format!("font-style:italic;color:{}", css(look.palette.muted)))
            .child(Element::new("p").style("white-space:pre-line").text(notes))
    })
}

/// Number, issue date and due date lines tagged with `data-field`.
pub(super) fn meta(view: &DocumentView) -> Vec<Element> {
    let mut lines = vec![
        Element::new("p").attr("data-field", "number").text(view.number_line()),
        Element::new("p")
            .attr("data-field", "issue-date")
            .text(view.issue_date_line()),
    ];
    lines.extend(
        view.due_date_line()
            .map(|line| Element::new("p").attr("data-field", "due-date").text(line)),
    );
    lines
}

/// The logo image, when the document has one.
pub(super) fn logo(view: &DocumentView, max_height: u32) -> Option<Element> {
    view.logo.as_ref().map(|src| {
        Element::new("img")
            .attr("data-field", "logo")
            .attr("src", src.as_str())
            .attr("alt", "Logo")
            .style(format!("max-height:{}px;max-width:200px", max_height))
    })
}

//! The rendering contract shared by every preview and export variant.
//!
//! [`DocumentView::build`] is the only place a [`Document`] is turned into
//! displayable facts: totals are aggregated once, money and dates are
//! formatted once, optional blocks are resolved once. Themes only decide
//! where and how those facts are drawn.

use chrono::{DateTime, NaiveDate};
use tracing::warn;

use crate::calc::{self, Totals};
use crate::model::{Client, Document, DocumentType, Sender};

/// Fixed display strings.
pub mod labels {
    pub const INVOICE_TITLE: &str = "FACTURE";
    pub const QUOTE_TITLE: &str = "DEVIS";
    pub const NUMBER_PREFIX: &str = "N° ";
    pub const ISSUE_DATE: &str = "Date d'émission: ";
    pub const DUE_DATE: &str = "Date d'échéance: ";
    pub const CLIENT: &str = "Client";
    pub const SIRET: &str = "SIRET: ";
    pub const REFERENCE: &str = "Réf: ";
    pub const TOTAL_HT: &str = "Total HT:";
    pub const TOTAL_TVA: &str = "Total TVA:";
    pub const TOTAL_TTC: &str = "Total TTC:";
    pub const PAYMENT_TERMS: &str = "Conditions de paiement";
    pub const TAX_EXEMPTION_NOTICE: &str = "TVA non applicable - Article 293B du CGI";

    /// Item table header, in column order.
    pub const ITEM_COLUMNS: [&str; 5] = ["Description", "Qté", "Prix unitaire", "TVA", "Total HT"];
}

/// Format an amount in euros, French style: `1234.5` gives `"1 234,50 €"`.
///
/// Non-finite values format as zero.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() {
        value
    } else {
        warn!(value, "non-finite amount shown as zero");
        0.0
    };
    let cents = (value.abs() * 100.0).round() as u128;
    let units = (cents / 100).to_string();
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    format!("{}{},{:02} €", sign, grouped, cents % 100)
}

/// Format an ISO date as `DD/MM/YYYY`.
///
/// Empty input gives an empty string; anything unparseable is returned
/// unchanged. RFC 3339 timestamps use their own calendar date.
pub fn format_date(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    let trimmed = date.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive()))
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

/// Shortest decimal form of a quantity or rate (`2`, `1.5`).
pub fn format_number(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Title for a document kind.
pub fn document_title(kind: DocumentType) -> &'static str {
    match kind {
        DocumentType::Invoice => labels::INVOICE_TITLE,
        DocumentType::Quote => labels::QUOTE_TITLE,
    }
}

/// Download file name: `Facture_<number>.pdf` or `Devis_<number>.pdf`.
/// An empty number becomes `1`; path separators are replaced.
pub fn file_name(kind: DocumentType, number: &str) -> String {
    let prefix = match kind {
        DocumentType::Invoice => "Facture",
        DocumentType::Quote => "Devis",
    };
    let number = number.trim();
    let number = if number.is_empty() { "1" } else { number };
    let safe: String = number
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("{}_{}.pdf", prefix, safe)
}

/// Which total a line of the totals block shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalKind {
    Ht,
    Tva,
    Ttc,
}

/// One labelled line of the totals block.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalLine {
    pub kind: TotalKind,
    pub label: &'static str,
    pub amount: String,
}

/// The totals block exactly as it must be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsDisplay {
    /// HT, TVA, TTC when taxed; HT, TTC when exempt.
    pub lines: Vec<TotalLine>,
    /// Legal notice, present only when exempt.
    pub exemption_notice: Option<&'static str>,
}

impl TotalsDisplay {
    /// Exempt documents hide the TVA line and show the pre-tax figure as the
    /// amount due. The underlying [`Totals`] are left untouched.
    pub fn new(totals: &Totals, exempt: bool) -> Self {
        let line = |kind, label, amount: f64| TotalLine {
            kind,
            label,
            amount: format_currency(amount),
        };
        if exempt {
            TotalsDisplay {
                lines: vec![
                    line(TotalKind::Ht, labels::TOTAL_HT, totals.total_ht),
                    line(TotalKind::Ttc, labels::TOTAL_TTC, totals.total_ht),
                ],
                exemption_notice: Some(labels::TAX_EXEMPTION_NOTICE),
            }
        } else {
            TotalsDisplay {
                lines: vec![
                    line(TotalKind::Ht, labels::TOTAL_HT, totals.total_ht),
                    line(TotalKind::Tva, labels::TOTAL_TVA, totals.total_tva),
                    line(TotalKind::Ttc, labels::TOTAL_TTC, totals.total_ttc),
                ],
                exemption_notice: None,
            }
        }
    }

    /// The line of the given kind, if displayed.
    pub fn line(&self, kind: TotalKind) -> Option<&TotalLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}

/// A party's displayable lines. Optional lines are `None` when blank.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyBlock {
    pub name: String,
    pub address_lines: Vec<String>,
    /// `"SIRET: …"` for the sender, `"Réf: …"` for the client.
    pub identifier: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn address_lines(address: &str) -> Vec<String> {
    if address.trim().is_empty() {
        return Vec::new();
    }
    address.lines().map(|l| l.trim_end().to_string()).collect()
}

impl PartyBlock {
    pub fn from_sender(sender: &Sender) -> Self {
        PartyBlock {
            name: sender.name.clone(),
            address_lines: address_lines(&sender.address),
            identifier: non_empty(&sender.siret).map(|s| format!("{}{}", labels::SIRET, s)),
            email: non_empty(&sender.email),
            phone: non_empty(&sender.phone),
        }
    }

    pub fn from_client(client: &Client) -> Self {
        PartyBlock {
            name: client.name.clone(),
            address_lines: address_lines(&client.address),
            identifier: non_empty(&client.reference).map(|r| format!("{}{}", labels::REFERENCE, r)),
            email: non_empty(&client.email),
            phone: non_empty(&client.phone),
        }
    }

    /// Every line after the name, in display order: address, identifier,
    /// email, phone.
    pub fn detail_lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.address_lines.iter().map(String::as_str).collect();
        lines.extend(self.identifier.as_deref());
        lines.extend(self.email.as_deref());
        lines.extend(self.phone.as_deref());
        lines
    }
}

/// One row of the item table, fully formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub tax_rate: String,
    pub total_ht: String,
}

impl ItemRow {
    /// Cells in [`labels::ITEM_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.description,
            &self.quantity,
            &self.unit_price,
            &self.tax_rate,
            &self.total_ht,
        ]
    }
}

/// Everything a renderer is allowed to show, already computed and formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentView {
    pub document_type: DocumentType,
    pub title: &'static str,
    /// The document number or its `"<TITLE>-0001"` fallback.
    pub number: String,
    pub issue_date: String,
    /// Present only for invoices.
    pub due_date: Option<String>,
    pub sender: PartyBlock,
    pub client: PartyBlock,
    pub rows: Vec<ItemRow>,
    /// Raw figures from [`calc::aggregate`].
    pub totals: Totals,
    pub totals_display: TotalsDisplay,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    /// Logo as a `data:` URI.
    pub logo: Option<String>,
    pub file_name: String,
}

impl DocumentView {
    pub fn build(doc: &Document) -> Self {
        let title = document_title(doc.document_type);
        let totals = calc::aggregate(&doc.items);

        let rows = doc
            .items
            .iter()
            .map(|item| {
                let line = calc::recompute(item);
                ItemRow {
                    description: line.description,
                    quantity: format_number(line.quantity),
                    unit_price: format_currency(line.unit_price),
                    tax_rate: format!("{}%", format_number(line.tax_rate)),
                    total_ht: format_currency(line.total_ht),
                }
            })
            .collect();

        let number = match doc.document_number.trim() {
            "" => format!("{}-0001", title),
            number => number.to_string(),
        };

        DocumentView {
            document_type: doc.document_type,
            title,
            number,
            issue_date: format_date(&doc.issue_date),
            due_date: doc.is_invoice().then(|| format_date(&doc.due_date)),
            sender: PartyBlock::from_sender(&doc.sender),
            client: PartyBlock::from_client(&doc.client),
            rows,
            totals,
            totals_display: TotalsDisplay::new(&totals, doc.is_exempt_from_tax),
            payment_terms: non_empty(&doc.payment_terms),
            notes: non_empty(&doc.notes),
            logo: doc.logo.as_deref().and_then(non_empty),
            file_name: file_name(doc.document_type, &doc.document_number),
        }
    }

    /// `"N° <number>"`.
    pub fn number_line(&self) -> String {
        format!("{}{}", labels::NUMBER_PREFIX, self.number)
    }

    /// `"Date d'émission: <date>"`.
    pub fn issue_date_line(&self) -> String {
        format!("{}{}", labels::ISSUE_DATE, self.issue_date)
    }

    /// `"Date d'échéance: <date>"`, invoices only.
    pub fn due_date_line(&self) -> Option<String> {
        self.due_date
            .as_ref()
            .map(|d| format!("{}{}", labels::DUE_DATE, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_examples() {
        assert_eq!(format_currency(1234.5), "1 234,50 €");
        assert_eq!(format_currency(0.0), "0,00 €");
        assert_eq!(format_currency(999.999), "1 000,00 €");
        assert_eq!(format_currency(1234567.891), "1 234 567,89 €");
        assert_eq!(format_currency(-42.1), "-42,10 €");
        assert_eq!(format_currency(-0.001), "0,00 €");
        assert_eq!(format_currency(f64::NAN), "0,00 €");
    }

    #[test]
    fn date_examples() {
        assert_eq!(format_date("2024-03-05"), "05/03/2024");
        assert_eq!(format_date("2024-03-05T10:00:00Z"), "05/03/2024");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("not-a-date"), "not-a-date");
        assert_eq!(format_date("2024-02-30"), "2024-02-30");
    }

    #[test]
    fn number_examples() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn file_names() {
        assert_eq!(file_name(DocumentType::Invoice, "F-12"), "Facture_F-12.pdf");
        assert_eq!(file_name(DocumentType::Quote, ""), "Devis_1.pdf");
        assert_eq!(file_name(DocumentType::Invoice, "2024/7"), "Facture_2024-7.pdf");
    }

    #[test]
    fn party_block_skips_blank_fields() {
        let sender = Sender {
            name: "ACME".to_string(),
            address: "1 rue A\n75000 Paris".to_string(),
            siret: "123".to_string(),
            email: String::new(),
            phone: "  ".to_string(),
        };
        let block = PartyBlock::from_sender(&sender);
        assert_eq!(
            block.detail_lines(),
            vec!["1 rue A", "75000 Paris", "SIRET: 123"]
        );
    }
}

//! The document data model and its JSON snapshot form.
//!
//! Field names serialize in camelCase so a snapshot written by the browser
//! form can be read back verbatim. Numeric fields are read leniently: numbers,
//! numeric strings, blanks and nulls are all accepted (see [`parse_amount`]).

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::calc;
use crate::config::DocumentDefaults;

/// Kind of commercial document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Invoice,
    Quote,
}

/// The issuing party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub name: String,
    /// Multi-line postal address.
    pub address: String,
    /// French company registration number.
    pub siret: String,
    pub email: String,
    pub phone: String,
}

/// The billed party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    /// Multi-line postal address.
    pub address: String,
    /// Customer reference chosen by the sender.
    pub reference: String,
    pub email: String,
    pub phone: String,
}

/// One billed line.
///
/// `total_ht` and `total_ttc` are derived by [`calc::recompute`]; they are
/// carried in the snapshot but never trusted for document totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub unit_price: f64,
    /// Percentage, conventionally 0-100.
    #[serde(deserialize_with = "lenient_number")]
    pub tax_rate: f64,
    #[serde(rename = "totalHT", deserialize_with = "lenient_number")]
    pub total_ht: f64,
    #[serde(rename = "totalTTC", deserialize_with = "lenient_number")]
    pub total_ttc: f64,
}

impl LineItem {
    /// A blank line: quantity 1, no price, the given tax rate.
    pub fn new(tax_rate: f64) -> Self {
        LineItem {
            description: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
            tax_rate,
            total_ht: 0.0,
            total_ttc: 0.0,
        }
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::new(DocumentDefaults::default().default_tax_rate)
    }
}

/// An invoice or quote being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    pub document_type: DocumentType,
    /// Free text; empty means "use the display fallback".
    pub document_number: String,
    /// ISO 8601 date, kept as entered.
    pub issue_date: String,
    /// ISO 8601 date, only shown on invoices.
    pub due_date: String,
    pub sender: Sender,
    pub client: Client,
    pub items: Vec<LineItem>,
    pub payment_terms: String,
    pub notes: String,
    /// Embedded image as a `data:` URI.
    pub logo: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub default_tax_rate: f64,
    pub is_exempt_from_tax: bool,
}

impl Document {
    /// An empty document dated today (UTC).
    pub fn new(defaults: &DocumentDefaults) -> Self {
        Self::empty_on(Utc::now().date_naive(), defaults)
    }

    /// An empty document issued on `today`: one blank line, the default tax
    /// rate, and a due date `due_in_days` later. An offset past the calendar
    /// range leaves the due date on the issue date.
    pub fn empty_on(today: NaiveDate, defaults: &DocumentDefaults) -> Self {
        let due = Duration::try_days(defaults.due_in_days)
            .and_then(|offset| today.checked_add_signed(offset))
            .unwrap_or(today);
        Document {
            document_type: DocumentType::Invoice,
            document_number: String::new(),
            issue_date: today.format("%Y-%m-%d").to_string(),
            due_date: due.format("%Y-%m-%d").to_string(),
            sender: Sender::default(),
            client: Client::default(),
            items: vec![LineItem::new(defaults.default_tax_rate)],
            payment_terms: defaults.payment_terms.clone(),
            notes: defaults.notes.clone(),
            logo: None,
            default_tax_rate: defaults.default_tax_rate,
            is_exempt_from_tax: false,
        }
    }

    pub fn is_invoice(&self) -> bool {
        self.document_type == DocumentType::Invoice
    }

    /// Parse a snapshot. Returns `None` for anything malformed.
    pub fn from_snapshot(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Serialize to the snapshot form.
    pub fn to_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Recompute every line's derived totals in place.
    pub fn recompute_items(&mut self) {
        for item in &mut self.items {
            *item = calc::recompute(item);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new(&DocumentDefaults::default())
    }
}

/// Parse user-entered numeric text the way a browser `parseFloat` would,
/// then collapse anything non-finite to 0.
///
/// The longest numeric prefix is used, so `"12abc"` is 12 and `"abc"` is 0.
/// Blank input and invalid input are indistinguishable here; both yield 0.
pub fn parse_amount(text: &str) -> f64 {
    let value = parse_float_prefix(text);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn parse_float_prefix(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_amount(&s),
        _ => 0.0,
    })
}

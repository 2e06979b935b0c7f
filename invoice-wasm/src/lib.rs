//! Browser bindings for the invoice and quote generator.
//!
//! The page drives one [`Editor`]: it edits the document, asks for preview
//! HTML and triggers PDF downloads. The document is kept in `localStorage`
//! under [`STORAGE_KEY`].

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use invoice_core::contract::{format_currency, labels};
use invoice_core::{
    export, preview, validate_for_export, Config, Document, ItemField, Persistence, Session,
    StoreError, Theme, STORAGE_KEY,
};

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_theme(theme: &str) -> Result<Theme, JsValue> {
    theme.parse::<Theme>().map_err(js_err)
}

// ----------------------------------------------------------
// localStorage
// ----------------------------------------------------------

/// [`Persistence`] backed by `window.localStorage`. Storage that the browser
/// refuses (private mode, disabled cookies) behaves as empty and read-only.
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        LocalStorage { storage }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Persistence for LocalStorage {
    fn save(&mut self, key: &str, snapshot: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, snapshot)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }

    fn load(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }
}

// ----------------------------------------------------------
// Download
// ----------------------------------------------------------

/// Hand `bytes` to the browser as a file download named `file_name`.
fn trigger_download(bytes: &[u8], file_name: &str, mime: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let document = window.document().ok_or_else(|| js_err("no document"))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}

// ----------------------------------------------------------
// Editor
// ----------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalsJs {
    total_ht: f64,
    total_tva: f64,
    total_ttc: f64,
    formatted_ht: String,
    formatted_tva: String,
    formatted_ttc: String,
}

#[derive(Serialize)]
struct ThemeJs {
    id: &'static str,
    label: &'static str,
}

/// JS class: Editor
///
/// ```js
/// const editor = new Editor();
/// editor.setItemField(0, "quantity", "3");
/// preview.innerHTML = editor.renderPreview("modern");
/// editor.downloadPdf("modern");
/// ```
#[wasm_bindgen]
pub struct Editor {
    session: Session<LocalStorage>,
    config: Config,
}

#[wasm_bindgen]
impl Editor {
    /// Load the stored document, or start an empty one. `config` is an
    /// optional JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<Editor, JsValue> {
        let config = match config {
            Some(json) => Config::from_json(&json).map_err(js_err)?,
            None => Config::default(),
        };
        let session = Session::load(LocalStorage::new(), config.defaults.clone());
        Ok(Editor { session, config })
    }

    /// Available themes as `[{ id, label }]`.
    pub fn themes() -> Result<JsValue, JsValue> {
        let themes: Vec<ThemeJs> = Theme::ALL
            .iter()
            .map(|t| ThemeJs {
                id: t.id(),
                label: t.label(),
            })
            .collect();
        serde_wasm_bindgen::to_value(&themes).map_err(js_err)
    }

    /// The document as a plain JS object in snapshot form.
    pub fn document(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.session.document()).map_err(js_err)
    }

    /// Replace the document with a JS object in snapshot form. Line totals
    /// are recomputed.
    #[wasm_bindgen(js_name = setDocument)]
    pub fn set_document(&mut self, value: JsValue) -> Result<(), JsValue> {
        let mut doc: Document = serde_wasm_bindgen::from_value(value).map_err(js_err)?;
        doc.recompute_items();
        *self.session.document_mut() = doc;
        Ok(())
    }

    /// The document as a JSON snapshot string.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.session.document().to_snapshot().map_err(js_err)
    }

    /// Replace the document from a JSON snapshot string.
    pub fn replace(&mut self, json: &str) -> Result<(), JsValue> {
        let mut doc = Document::from_snapshot(json).ok_or_else(|| js_err("malformed document"))?;
        doc.recompute_items();
        *self.session.document_mut() = doc;
        Ok(())
    }

    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&mut self) -> usize {
        self.session.add_item()
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&mut self, index: usize) -> bool {
        self.session.remove_item(index).is_some()
    }

    /// Apply form input to a line. `field` is `description`, `quantity`,
    /// `unitPrice` or `taxRate`.
    #[wasm_bindgen(js_name = setItemField)]
    pub fn set_item_field(&mut self, index: usize, field: &str, value: &str) -> Result<bool, JsValue> {
        let field = ItemField::from_key(field).ok_or_else(|| js_err(format!("unknown field: {}", field)))?;
        Ok(self.session.set_item_field(index, field, value))
    }

    /// Embed an uploaded image file as the logo.
    #[wasm_bindgen(js_name = setLogo)]
    pub fn set_logo(&mut self, bytes: &[u8], mime: &str) {
        self.session.set_logo(bytes, mime);
    }

    #[wasm_bindgen(js_name = clearLogo)]
    pub fn clear_logo(&mut self) {
        self.session.clear_logo();
    }

    /// Running totals for the form.
    pub fn totals(&self) -> Result<JsValue, JsValue> {
        let totals = self.session.totals();
        let out = TotalsJs {
            total_ht: totals.total_ht,
            total_tva: totals.total_tva,
            total_ttc: totals.total_ttc,
            formatted_ht: format_currency(totals.total_ht),
            formatted_tva: format_currency(totals.total_tva),
            formatted_ttc: format_currency(totals.total_ttc),
        };
        serde_wasm_bindgen::to_value(&out).map_err(js_err)
    }

    /// First reason the document cannot leave the form, if any.
    #[wasm_bindgen(js_name = validationMessage)]
    pub fn validation_message(&self) -> Option<String> {
        validate_for_export(self.session.document())
            .err()
            .map(|e| e.to_string())
    }

    pub fn save(&mut self) -> Result<(), JsValue> {
        self.session.save().map_err(js_err)
    }

    /// Validate and save. The error message is the notice to show.
    #[wasm_bindgen(js_name = continueToTemplates)]
    pub fn continue_to_templates(&mut self) -> Result<(), JsValue> {
        self.session.continue_to_templates().map_err(js_err)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.session.reset().map_err(js_err)
    }

    /// Preview HTML for a theme id (`classic`, … or `template1`, …).
    #[wasm_bindgen(js_name = renderPreview)]
    pub fn render_preview(&self, theme: &str) -> Result<String, JsValue> {
        let theme = parse_theme(theme)?;
        Ok(preview::render(self.session.document(), theme).to_html())
    }

    #[wasm_bindgen(js_name = fileName)]
    pub fn file_name(&self) -> String {
        let doc = self.session.document();
        invoice_core::contract::file_name(doc.document_type, &doc.document_number)
    }

    /// PDF bytes for a theme.
    #[wasm_bindgen(js_name = exportPdf)]
    pub fn export_pdf(&self, theme: &str) -> Result<Vec<u8>, JsValue> {
        let theme = parse_theme(theme)?;
        let file = export(self.session.document(), theme, &self.config.export).map_err(js_err)?;
        Ok(file.bytes)
    }

    /// Export and download the PDF. Incomplete documents are refused with
    /// their validation notice.
    #[wasm_bindgen(js_name = downloadPdf)]
    pub fn download_pdf(&self, theme: &str) -> Result<(), JsValue> {
        let theme = parse_theme(theme)?;
        validate_for_export(self.session.document()).map_err(js_err)?;
        let file = export(self.session.document(), theme, &self.config.export).map_err(js_err)?;
        trigger_download(&file.bytes, &file.file_name, "application/pdf")
    }
}

/// Storage key used for the document, for pages that inspect it directly.
#[wasm_bindgen(js_name = storageKey)]
pub fn storage_key() -> String {
    STORAGE_KEY.to_string()
}

/// The legal notice shown on tax-exempt documents.
#[wasm_bindgen(js_name = taxExemptionNotice)]
pub fn tax_exemption_notice() -> String {
    labels::TAX_EXEMPTION_NOTICE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_without_window_is_unavailable() {
        let mut store = LocalStorage { storage: None };
        assert_eq!(store.load(STORAGE_KEY), None);
        assert_eq!(store.save(STORAGE_KEY, "{}"), Err(StoreError::Unavailable));
        assert_eq!(store.remove(STORAGE_KEY), Err(StoreError::Unavailable));
    }

    #[test]
    fn session_over_missing_storage_starts_empty() {
        let session = Session::load(LocalStorage { storage: None }, Config::default().defaults);
        assert_eq!(session.document().items.len(), 1);
        assert!(validate_for_export(session.document()).is_err());
    }
}

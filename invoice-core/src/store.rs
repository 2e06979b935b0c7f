//! The edit session and its persistence adapter.
//!
//! A [`Session`] owns the one mutable [`Document`] and talks to storage only
//! through [`Persistence`], so browsers plug in `localStorage` and tests plug
//! in [`MemoryStore`].

use std::collections::HashMap;

use tracing::{info, warn};

use crate::calc::{self, Totals};
use crate::config::DocumentDefaults;
use crate::error::{ContinueError, StoreError, ValidationError};
use crate::model::{parse_amount, Document, LineItem};
use crate::pdf::images::encode_data_uri;

/// Key under which the document snapshot is stored.
pub const STORAGE_KEY: &str = "invoiceData";

/// Opaque key-value storage for document snapshots.
pub trait Persistence {
    fn save(&mut self, key: &str, snapshot: &str) -> Result<(), StoreError>;

    fn load(&self, key: &str) -> Option<String>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Persistence for MemoryStore {
    fn save(&mut self, key: &str, snapshot: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Line item field edited from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Quantity,
    UnitPrice,
    TaxRate,
}

impl ItemField {
    /// Look a field up by its snapshot key (`"unitPrice"`, …).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "description" => Some(ItemField::Description),
            "quantity" => Some(ItemField::Quantity),
            "unitPrice" => Some(ItemField::UnitPrice),
            "taxRate" => Some(ItemField::TaxRate),
            _ => None,
        }
    }
}

/// Check that a document can leave the form. Returns the first problem.
pub fn validate_for_export(doc: &Document) -> Result<(), ValidationError> {
    if doc.sender.name.trim().is_empty() {
        return Err(ValidationError::MissingSenderName);
    }
    if doc.client.name.trim().is_empty() {
        return Err(ValidationError::MissingClientName);
    }
    if doc.items.is_empty() {
        return Err(ValidationError::NoItems);
    }
    Ok(())
}

/// The single writer of a document.
pub struct Session<P: Persistence> {
    store: P,
    defaults: DocumentDefaults,
    document: Document,
}

impl<P: Persistence> Session<P> {
    /// Start from the stored snapshot, or an empty document when there is
    /// none or it cannot be read.
    pub fn load(store: P, defaults: DocumentDefaults) -> Self {
        let document = match store.load(STORAGE_KEY) {
            Some(snapshot) => Document::from_snapshot(&snapshot).unwrap_or_else(|| {
                warn!(key = STORAGE_KEY, "stored document is malformed, starting empty");
                Document::new(&defaults)
            }),
            None => Document::new(&defaults),
        };
        Session {
            store,
            defaults,
            document,
        }
    }

    /// Start from an explicit document, ignoring storage.
    pub fn with_document(store: P, defaults: DocumentDefaults, document: Document) -> Self {
        Session {
            store,
            defaults,
            document,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access for edits with no dedicated operation (parties,
    /// dates, notes).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn defaults(&self) -> &DocumentDefaults {
        &self.defaults
    }

    /// Running totals, from the same aggregate every renderer uses.
    pub fn totals(&self) -> Totals {
        calc::aggregate(&self.document.items)
    }

    /// Append a blank line using the document's default tax rate.
    pub fn add_item(&mut self) -> usize {
        self.document
            .items
            .push(LineItem::new(self.document.default_tax_rate));
        self.document.items.len() - 1
    }

    /// Remove a line. Out-of-range indices are ignored.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        (index < self.document.items.len()).then(|| self.document.items.remove(index))
    }

    /// Apply raw form input to a line. Numbers are parsed permissively and
    /// the line's totals recomputed. Returns `false` for an unknown index.
    pub fn set_item_field(&mut self, index: usize, field: ItemField, input: &str) -> bool {
        let Some(item) = self.document.items.get_mut(index) else {
            return false;
        };
        match field {
            ItemField::Description => item.description = input.to_string(),
            ItemField::Quantity => item.quantity = parse_amount(input),
            ItemField::UnitPrice => item.unit_price = parse_amount(input),
            ItemField::TaxRate => item.tax_rate = parse_amount(input),
        }
        *item = calc::recompute(item);
        true
    }

    /// Embed an uploaded image as the logo.
    pub fn set_logo(&mut self, bytes: &[u8], mime: &str) {
        self.document.logo = Some(encode_data_uri(bytes, mime));
    }

    pub fn clear_logo(&mut self) {
        self.document.logo = None;
    }

    /// Persist the current document.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let snapshot = self
            .document
            .to_snapshot()
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.save(STORAGE_KEY, &snapshot)?;
        info!(key = STORAGE_KEY, bytes = snapshot.len(), "document saved");
        Ok(())
    }

    /// Validate, then save. Nothing is saved when validation fails.
    pub fn continue_to_templates(&mut self) -> Result<(), ContinueError> {
        validate_for_export(&self.document)?;
        self.save()?;
        Ok(())
    }

    /// Forget the stored snapshot and start over with an empty document.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.remove(STORAGE_KEY)?;
        self.document = Document::new(&self.defaults);
        info!(key = STORAGE_KEY, "document reset");
        Ok(())
    }

    pub fn into_parts(self) -> (P, Document) {
        (self.store, self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<MemoryStore> {
        Session::load(MemoryStore::new(), DocumentDefaults::default())
    }

    #[test]
    fn validation_order() {
        let mut doc = Document::default();
        assert_eq!(validate_for_export(&doc), Err(ValidationError::MissingSenderName));
        doc.sender.name = "ACME".to_string();
        assert_eq!(validate_for_export(&doc), Err(ValidationError::MissingClientName));
        doc.client.name = "Client".to_string();
        doc.items.clear();
        assert_eq!(validate_for_export(&doc), Err(ValidationError::NoItems));
        doc.items.push(LineItem::new(20.0));
        assert_eq!(validate_for_export(&doc), Ok(()));
    }

    #[test]
    fn remove_out_of_range_is_ignored() {
        let mut s = session();
        assert!(s.remove_item(5).is_none());
        assert_eq!(s.document().items.len(), 1);
    }

    #[test]
    fn field_keys_match_snapshot_names() {
        assert_eq!(ItemField::from_key("unitPrice"), Some(ItemField::UnitPrice));
        assert_eq!(ItemField::from_key("taxRate"), Some(ItemField::TaxRate));
        assert_eq!(ItemField::from_key("totalHT"), None);
    }

    #[test]
    fn unknown_index_edit_is_rejected() {
        let mut s = session();
        assert!(!s.set_item_field(3, ItemField::Quantity, "2"));
    }
}

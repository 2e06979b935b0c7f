//! Core of the invoice and quote generator.
//!
//! A [`Document`] is edited through a [`Session`], turned into a
//! [`DocumentView`] once, and then drawn either as an HTML preview
//! ([`preview`]) or as a PDF ([`export`]) in one of four [`Theme`]s. Both
//! renderers show the same totals because both read them from the view.

pub mod calc;
pub mod config;
pub mod contract;
pub mod error;
pub mod export;
pub mod model;
pub mod pdf;
pub mod preview;
pub mod store;
pub mod theme;

pub use calc::Totals;
pub use config::{Config, DocumentDefaults, ExportSettings};
pub use contract::DocumentView;
pub use error::{
    ConfigError, ContinueError, ExportError, ImageError, StoreError, UnknownTheme, ValidationError,
};
pub use export::{export, Block, Cursor, ExportedFile, Layout};
pub use model::{Client, Document, DocumentType, LineItem, Sender};
pub use preview::{render, Element, Node};
pub use store::{validate_for_export, ItemField, MemoryStore, Persistence, Session, STORAGE_KEY};
pub use theme::{Palette, Theme};

//! A small streaming PDF writer: standard fonts, fills, lines, images and
//! paginated tables. Everything the exporters draw goes through
//! [`PdfCanvas`].

pub mod canvas;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod table;
pub mod writer;

pub use canvas::{ImageId, PdfCanvas, TextStyle};
pub use fonts::Font;
pub use graphics::{Color, Rect};
pub use images::{ImageData, ImageFormat};
pub use table::{Align, Column, FitResult, Row, RowStyle, Table, TableCursor};

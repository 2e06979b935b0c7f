/// A tax-exempt quote long enough to span several pages.
///
/// Run with:
///   cargo run --example generate_long_quote -p invoice-examples
///
/// Writes demos/output/Devis_<number>.pdf and prints where each block
/// landed.
use std::fs;
use std::path::Path;

use invoice_core::{export, Client, Config, Document, DocumentType, LineItem, Sender, Theme};
use tracing::info;
use tracing_subscriber::EnvFilter;

const OUTPUT_DIR: &str = "demos/output";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = Config::default();

    let items = (1..=75)
        .map(|n| {
            let mut line = LineItem::new(0.0);
            line.description = format!("Atelier de formation n°{} (demi-journée)", n);
            line.quantity = 1.0 + (n % 3) as f64;
            line.unit_price = 180.0 + (n % 5) as f64 * 15.0;
            line
        })
        .collect();

    let mut doc = Document {
        document_type: DocumentType::Quote,
        document_number: "D-2024-0007".to_string(),
        is_exempt_from_tax: true,
        sender: Sender {
            name: "Claire Morel, formatrice".to_string(),
            address: "8 chemin des Vignes\n33000 Bordeaux".to_string(),
            siret: "987 654 321 00021".to_string(),
            ..Sender::default()
        },
        client: Client {
            name: "Association Les Jardins Partagés".to_string(),
            address: "Maison des associations\n33800 Bordeaux".to_string(),
            ..Client::default()
        },
        items,
        ..Document::new(&config.defaults)
    };
    doc.recompute_items();

    let file = export(&doc, Theme::Elegant, &config.export)?;
    fs::create_dir_all(OUTPUT_DIR)?;
    let path = Path::new(OUTPUT_DIR).join(&file.file_name);
    fs::write(&path, &file.bytes)?;

    for placement in &file.layout.placements {
        info!(
            block = ?placement.block,
            start_page = placement.start.page,
            end_page = placement.end.page,
            "placed"
        );
    }
    info!(path = %path.display(), pages = file.layout.pages, "written");
    Ok(())
}

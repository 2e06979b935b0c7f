/// Sample invoice in every theme, as PDF and as preview HTML.
///
/// Run with:
///   cargo run --example generate_documents -p invoice-examples
///
/// Writes demos/output/Facture_<number>-<theme>.pdf and .html.
/// Set RUST_LOG=debug to see page breaks and block placement.
use std::fs;
use std::path::Path;

use invoice_core::{
    export, preview, Client, Config, Document, LineItem, Sender, Theme,
};
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

fn item(description: &str, quantity: f64, unit_price: f64, tax_rate: f64) -> LineItem {
    LineItem {
        description: description.to_string(),
        quantity,
        unit_price,
        tax_rate,
        ..LineItem::new(tax_rate)
    }
}

fn sample(config: &Config) -> Document {
    let mut doc = Document {
        document_number: "F-2024-0042".to_string(),
        sender: Sender {
            name: "Atelier Dupont".to_string(),
            address: "12 rue des Lilas\n75011 Paris".to_string(),
            siret: "123 456 789 00012".to_string(),
            email: "contact@atelier-dupont.fr".to_string(),
            phone: "01 23 45 67 89".to_string(),
        },
        client: Client {
            name: "Martin & Fils SARL".to_string(),
            address: "3 place Bellecour\n69002 Lyon".to_string(),
            reference: "CL-0187".to_string(),
            email: "compta@martin-fils.fr".to_string(),
            phone: String::new(),
        },
        items: vec![
            item("Conception de l'identité visuelle", 1.0, 1800.0, 20.0),
            item("Développement du site vitrine (jours)", 6.0, 450.0, 20.0),
            item("Hébergement annuel", 1.0, 120.0, 20.0),
            item("Ouvrage de référence", 2.0, 35.0, 5.5),
        ],
        ..Document::new(&config.defaults)
    };
    doc.recompute_items();
    doc
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = Config::default();
    let doc = sample(&config);
    fs::create_dir_all(OUTPUT_DIR)?;

    for theme in Theme::ALL {
        let file = export(&doc, theme, &config.export)?;
        let stem = file.file_name.trim_end_matches(".pdf");
        let pdf_path = Path::new(OUTPUT_DIR).join(format!("{}-{}.pdf", stem, theme.id()));
        fs::write(&pdf_path, &file.bytes)?;

        let html = preview::render(&doc, theme).to_html();
        let html_path = pdf_path.with_extension("html");
        fs::write(&html_path, format!("<!doctype html><meta charset=\"utf-8\">{}", html))?;

        info!(theme = %theme, pdf = %pdf_path.display(), html = %html_path.display(), "written");
    }
    Ok(())
}

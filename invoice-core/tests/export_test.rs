use std::io::{self, Write};

use invoice_core::contract::{labels, TotalKind};
use invoice_core::export::{export_to, Block};
use invoice_core::pdf::fonts::encode_win_ansi;
use invoice_core::pdf::images::encode_data_uri;
use invoice_core::preview::render;
use invoice_core::{
    export, Client, Document, DocumentType, DocumentView, ExportError, ExportSettings, LineItem,
    Sender, Theme,
};

/// Check whether a byte pattern exists in the buffer.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Text as it appears inside an uncompressed content stream.
fn pdf_text(text: &str) -> Vec<u8> {
    encode_win_ansi(text)
}

fn plain_settings() -> ExportSettings {
    ExportSettings {
        compress: false,
        ..ExportSettings::default()
    }
}

fn line(description: &str, quantity: f64, unit_price: f64) -> LineItem {
    LineItem {
        description: description.to_string(),
        quantity,
        unit_price,
        tax_rate: 20.0,
        ..LineItem::default()
    }
}

fn sample() -> Document {
    Document {
        document_number: "F-12".to_string(),
        issue_date: "2024-03-05".to_string(),
        due_date: "2024-04-04".to_string(),
        sender: Sender {
            name: "Atelier Dupont".to_string(),
            address: "12 rue des Lilas\n75011 Paris".to_string(),
            siret: "123 456 789 00012".to_string(),
            ..Sender::default()
        },
        client: Client {
            name: "Martin SARL".to_string(),
            address: "3 place Bellecour\n69002 Lyon".to_string(),
            ..Client::default()
        },
        items: vec![line("Conseil", 3.0, 400.0), line("Deplacement", 1.0, 34.5)],
        payment_terms: "30 jours fin de mois".to_string(),
        notes: "Merci pour votre confiance".to_string(),
        ..Document::default()
    }
}

fn tiny_png() -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, 2, 2);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        let pixels: [u8; 16] = [
            255, 0, 0, 255, 0, 255, 0, 128, //
            0, 0, 255, 255, 255, 255, 255, 0,
        ];
        writer.write_image_data(&pixels).unwrap();
    }
    out
}

// -------------------------------------------------------
// Output shape
// -------------------------------------------------------

#[test]
fn exports_a_complete_pdf() {
    let file = export(&sample(), Theme::Classic, &plain_settings()).unwrap();
    assert_eq!(file.file_name, "Facture_F-12.pdf");
    assert!(file.bytes.starts_with(b"%PDF-1.7"));
    assert!(contains(&file.bytes, b"%%EOF"));
    assert!(contains(&file.bytes, b"/Count 1"));
    assert_eq!(file.layout.pages, 1);
    assert!(contains(&file.bytes, b"(FACTURE) Tj"));
    assert!(contains(&file.bytes, &pdf_text("N° F-12")));
}

#[test]
fn quote_file_name_and_no_due_date() {
    let doc = Document {
        document_type: DocumentType::Quote,
        document_number: String::new(),
        ..sample()
    };
    for theme in Theme::ALL {
        let file = export(&doc, theme, &plain_settings()).unwrap();
        assert_eq!(file.file_name, "Devis_1.pdf");
        assert!(contains(&file.bytes, b"(DEVIS) Tj"), "{}", theme);
        assert!(contains(&file.bytes, &pdf_text("DEVIS-0001")), "{}", theme);
        assert!(!contains(&file.bytes, &pdf_text(labels::DUE_DATE)), "{}", theme);
    }
}

#[test]
fn compressed_output_uses_flate() {
    let file = export(&sample(), Theme::Modern, &ExportSettings::default()).unwrap();
    assert!(contains(&file.bytes, b"/Filter /FlateDecode"));
    assert!(!contains(&file.bytes, b"(FACTURE) Tj"));
}

// -------------------------------------------------------
// Totals agreement
// -------------------------------------------------------

#[test]
fn pdf_and_preview_show_the_same_totals() {
    let doc = sample();
    for theme in Theme::ALL {
        let file = export(&doc, theme, &plain_settings()).unwrap();
        let node = render(&doc, theme);
        for key in ["ht", "tva", "ttc"] {
            let shown = node.find_by_attr("data-total", key).unwrap().text_content();
            let amount = shown.lines().last().unwrap().to_string();
            assert!(
                contains(&file.bytes, &pdf_text(&amount)),
                "{} {}: {:?} missing from PDF",
                theme,
                key,
                amount
            );
        }
        assert!(contains(&file.bytes, &pdf_text("1 481,40 €")), "{}", theme);
    }
}

#[test]
fn exempt_pdf_has_notice_once_and_no_tva_line() {
    let doc = Document {
        is_exempt_from_tax: true,
        ..sample()
    };
    let view = DocumentView::build(&doc);
    assert!(view.totals_display.line(TotalKind::Tva).is_none());

    for theme in Theme::ALL {
        let file = export(&doc, theme, &plain_settings()).unwrap();
        assert_eq!(
            count(&file.bytes, labels::TAX_EXEMPTION_NOTICE.as_bytes()),
            1,
            "{}",
            theme
        );
        assert!(!contains(&file.bytes, labels::TOTAL_TVA.as_bytes()), "{}", theme);
    }
}

#[test]
fn taxed_pdf_has_no_notice() {
    let file = export(&sample(), Theme::Dark, &plain_settings()).unwrap();
    assert!(!contains(&file.bytes, labels::TAX_EXEMPTION_NOTICE.as_bytes()));
    assert!(contains(&file.bytes, labels::TOTAL_TVA.as_bytes()));
}

// -------------------------------------------------------
// Layout and pagination
// -------------------------------------------------------

#[test]
fn blocks_are_laid_out_in_order() {
    for theme in Theme::ALL {
        let file = export(&sample(), theme, &plain_settings()).unwrap();
        let blocks: Vec<Block> = file.layout.placements.iter().map(|p| p.block).collect();
        assert_eq!(
            blocks,
            vec![
                Block::Header,
                Block::Parties,
                Block::Items,
                Block::Totals,
                Block::PaymentTerms,
                Block::Notes
            ]
        );
        for p in &file.layout.placements {
            assert!(p.start <= p.end, "{} {:?}", theme, p);
        }
        for pair in file.layout.placements.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{} {:?}", theme, pair);
        }
    }
}

#[test]
fn optional_blocks_are_skipped() {
    let doc = Document {
        payment_terms: String::new(),
        notes: String::new(),
        ..sample()
    };
    let file = export(&doc, Theme::Classic, &plain_settings()).unwrap();
    assert!(file.layout.get(Block::PaymentTerms).is_none());
    assert!(file.layout.get(Block::Notes).is_none());
    assert!(file.layout.get(Block::Totals).is_some());
}

#[test]
fn long_item_list_continues_on_new_pages() {
    let mut doc = sample();
    doc.items = (0..120)
        .map(|i| line(&format!("Prestation {}", i), 1.0, 10.0))
        .collect();

    for theme in Theme::ALL {
        let file = export(&doc, theme, &plain_settings()).unwrap();
        let pages = file.layout.pages;
        assert!(pages > 1, "{}", theme);
        assert!(contains(&file.bytes, format!("/Count {}", pages).as_bytes()));

        let items = file.layout.get(Block::Items).unwrap();
        assert_eq!(items.start.page, 0);
        assert!(items.end.page > 0);
        let totals = file.layout.get(Block::Totals).unwrap();
        assert!(totals.start.page >= items.end.page);

        // Every row is drawn, and the header repeats on each table page.
        assert!(contains(&file.bytes, b"(Prestation 119) Tj"));
        let header_rows = count(&file.bytes, &pdf_text("(Prix unitaire) Tj"));
        assert_eq!(header_rows, items.end.page + 1, "{}", theme);
        assert!(contains(&file.bytes, &pdf_text("1 200,00 €")));
    }
}

#[test]
fn oversized_row_is_still_drawn() {
    let mut doc = sample();
    doc.items = vec![line(&"mot ".repeat(3_000), 1.0, 5.0)];
    let file = export(&doc, Theme::Classic, &plain_settings()).unwrap();
    assert!(file.layout.get(Block::Totals).is_some());
    assert!(contains(&file.bytes, &pdf_text("5,00 €")));
}

// -------------------------------------------------------
// Logos
// -------------------------------------------------------

#[test]
fn png_logo_is_embedded_with_soft_mask() {
    let doc = Document {
        logo: Some(encode_data_uri(&tiny_png(), "image/png")),
        ..sample()
    };
    for theme in Theme::ALL {
        let file = export(&doc, theme, &plain_settings()).unwrap();
        assert!(contains(&file.bytes, b"/Subtype /Image"), "{}", theme);
        assert!(contains(&file.bytes, b"/SMask"), "{}", theme);
        assert!(contains(&file.bytes, b"/Im1 Do"), "{}", theme);
    }
}

#[test]
fn undecodable_logo_is_skipped() {
    let doc = Document {
        logo: Some("data:image/png;base64,not-an-image".to_string()),
        ..sample()
    };
    let file = export(&doc, Theme::Modern, &plain_settings()).unwrap();
    assert!(!contains(&file.bytes, b"/Subtype /Image"));
    assert!(contains(&file.bytes, b"(FACTURE) Tj"));
}

// -------------------------------------------------------
// Sink errors
// -------------------------------------------------------

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_is_reported() {
    let view = DocumentView::build(&sample());
    let result = export_to(&view, Theme::Classic, &plain_settings(), BrokenSink);
    assert!(matches!(result, Err(ExportError::Io(_))));
}

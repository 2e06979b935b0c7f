use invoice_core::contract::{labels, TotalKind};
use invoice_core::{Client, Document, DocumentType, DocumentView, LineItem, Sender};
use pretty_assertions::assert_eq;

fn item(description: &str, quantity: f64, unit_price: f64, tax_rate: f64) -> LineItem {
    LineItem {
        description: description.to_string(),
        quantity,
        unit_price,
        tax_rate,
        ..LineItem::new(tax_rate)
    }
}

fn sample() -> Document {
    Document {
        document_number: "F-2024-007".to_string(),
        issue_date: "2024-03-05".to_string(),
        due_date: "2024-04-04".to_string(),
        sender: Sender {
            name: "Atelier Dupont".to_string(),
            address: "12 rue des Lilas\n75011 Paris".to_string(),
            siret: "123 456 789 00012".to_string(),
            email: "contact@dupont.fr".to_string(),
            phone: String::new(),
        },
        client: Client {
            name: "Martin SARL".to_string(),
            address: "3 place Bellecour\n69002 Lyon".to_string(),
            reference: "CL-42".to_string(),
            email: String::new(),
            phone: "04 00 00 00 00".to_string(),
        },
        items: vec![
            item("Développement", 2.0, 100.0, 20.0),
            item("Hébergement", 1.0, 50.0, 5.5),
        ],
        ..Document::default()
    }
}

#[test]
fn invoice_view() {
    let view = DocumentView::build(&sample());
    assert_eq!(view.title, "FACTURE");
    assert_eq!(view.number_line(), "N° F-2024-007");
    assert_eq!(view.issue_date_line(), "Date d'émission: 05/03/2024");
    assert_eq!(view.due_date_line().as_deref(), Some("Date d'échéance: 04/04/2024"));
    assert_eq!(view.file_name, "Facture_F-2024-007.pdf");

    assert_eq!(view.rows.len(), 2);
    assert_eq!(
        view.rows[0].cells(),
        ["Développement", "2", "100,00 €", "20%", "200,00 €"]
    );
    assert_eq!(view.rows[1].tax_rate, "5.5%");

    let amounts: Vec<(TotalKind, &str)> = view
        .totals_display
        .lines
        .iter()
        .map(|l| (l.kind, l.amount.as_str()))
        .collect();
    assert_eq!(
        amounts,
        vec![
            (TotalKind::Ht, "250,00 €"),
            (TotalKind::Tva, "42,75 €"),
            (TotalKind::Ttc, "292,75 €"),
        ]
    );
    assert_eq!(view.totals_display.exemption_notice, None);
}

#[test]
fn quote_has_no_due_date() {
    let doc = Document {
        document_type: DocumentType::Quote,
        ..sample()
    };
    let view = DocumentView::build(&doc);
    assert_eq!(view.title, "DEVIS");
    assert_eq!(view.due_date, None);
    assert_eq!(view.due_date_line(), None);
    assert_eq!(view.file_name, "Devis_F-2024-007.pdf");
}

#[test]
fn empty_number_falls_back() {
    let doc = Document {
        document_number: String::new(),
        ..sample()
    };
    let view = DocumentView::build(&doc);
    assert_eq!(view.number, "FACTURE-0001");
    assert_eq!(view.file_name, "Facture_1.pdf");

    let quote = Document {
        document_type: DocumentType::Quote,
        document_number: String::new(),
        ..sample()
    };
    assert_eq!(DocumentView::build(&quote).number, "DEVIS-0001");
}

#[test]
fn exempt_view_hides_tva_and_keeps_raw_totals() {
    let doc = Document {
        is_exempt_from_tax: true,
        ..sample()
    };
    let view = DocumentView::build(&doc);
    let display = &view.totals_display;

    assert!(display.line(TotalKind::Tva).is_none());
    assert_eq!(display.line(TotalKind::Ht).map(|l| l.amount.as_str()), Some("250,00 €"));
    assert_eq!(display.line(TotalKind::Ttc).map(|l| l.amount.as_str()), Some("250,00 €"));
    assert_eq!(display.exemption_notice, Some(labels::TAX_EXEMPTION_NOTICE));

    assert_eq!(view.totals.total_tva, 42.75);
    assert_eq!(view.totals.total_ttc, 292.75);
}

#[test]
fn party_blocks_carry_identifiers() {
    let view = DocumentView::build(&sample());
    assert_eq!(
        view.sender.detail_lines(),
        vec![
            "12 rue des Lilas",
            "75011 Paris",
            "SIRET: 123 456 789 00012",
            "contact@dupont.fr"
        ]
    );
    assert_eq!(view.client.identifier.as_deref(), Some("Réf: CL-42"));
    assert_eq!(view.client.email, None);
}

#[test]
fn blank_optional_blocks_are_absent() {
    let doc = Document {
        payment_terms: "   ".to_string(),
        notes: String::new(),
        logo: Some(String::new()),
        ..sample()
    };
    let view = DocumentView::build(&doc);
    assert_eq!(view.payment_terms, None);
    assert_eq!(view.notes, None);
    assert_eq!(view.logo, None);
}

#[test]
fn stale_stored_line_totals_are_not_shown() {
    let mut doc = sample();
    doc.items[0].total_ht = 1.0;
    let view = DocumentView::build(&doc);
    assert_eq!(view.rows[0].total_ht, "200,00 €");
    assert_eq!(view.totals.total_ht, 250.0);
}

#[test]
fn exempt_single_line_shows_pre_tax_total_as_due() {
    let doc = Document {
        is_exempt_from_tax: true,
        items: vec![item("Prestation", 2.0, 100.0, 20.0)],
        ..sample()
    };
    let view = DocumentView::build(&doc);
    assert_eq!(view.totals.total_ht, 200.0);
    assert_eq!(
        view.totals_display.line(TotalKind::Ttc).map(|l| l.amount.as_str()),
        Some("200,00 €")
    );
    assert!(view.totals_display.line(TotalKind::Tva).is_none());
}

#[test]
fn blank_number_falls_back_in_title_and_file_name() {
    let doc = Document {
        document_number: "   ".to_string(),
        ..sample()
    };
    let view = DocumentView::build(&doc);
    assert_eq!(view.number, "FACTURE-0001");
    assert_eq!(view.number_line(), "N° FACTURE-0001");
    assert_eq!(view.file_name, "Facture_1.pdf");

    let padded = Document {
        document_number: "  F-9 ".to_string(),
        ..sample()
    };
    let view = DocumentView::build(&padded);
    assert_eq!(view.number, "F-9");
    assert_eq!(view.file_name, "Facture_F-9.pdf");
}

#[test]
fn overflowing_line_is_capped_not_zeroed() {
    let doc = Document {
        items: vec![item("Énorme", 1e200, 1e200, 0.0)],
        ..sample()
    };
    let view = DocumentView::build(&doc);
    assert!(view.totals.total_ht.is_finite());
    assert_eq!(view.rows[0].total_ht, "1 000 000 000 000 000,00 €");
    assert_eq!(
        view.totals_display.line(TotalKind::Ht).map(|l| l.amount.as_str()),
        Some("1 000 000 000 000 000,00 €")
    );
}

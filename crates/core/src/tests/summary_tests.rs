// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_test_contact, create_test_delivery, create_test_now, create_test_order_number,
    create_test_prices, create_test_promotion, create_test_specs,
};
use crate::{
    LABEL_CITY, LABEL_POSTAL_CODE, LABEL_STREET, PricingResult, SummaryInput, compute_pricing,
    format_order_summary,
};
use fotoexpres_domain::{
    ContactInfo, OrderNumber, PhotoSpec, ProcessingOptions, Promotion, PromotionScope,
    QuantityDiscountTable, StoreSettings,
};

const EXPECTED_BASIC_SUMMARY: &str = "\
========================================
PORUDŽBINA: ORD-482913
DATUM: 2026-10-18 14:30:05
========================================

PODACI O KUPCU:
Ime i prezime: Jelena Jovanović
Email: jelena@example.com
Telefon: +381 63 555 0101
Ulica: Knez Mihailova 5
Poštanski broj: 11000
Grad: Beograd
Napomena: Pozvati pre dostave

OPCIJE OBRADE:
Kropovati fotografiju kako bi je prilagodili formatu: DA
Popunite belim: NE

FOTOGRAFIJE:
---
Fotografija 1: plaza.jpg
Format: 9x13 cm
Papir: Sjajni
Količina: 2
Cena po komadu: 12 RSD
Ukupno: 24 RSD
---
Fotografija 2: planina.jpg
Format: 10x15 cm
Papir: Mat
Količina: 3
Cena po komadu: 18 RSD
Ukupno: 54 RSD

OBRAČUN:
Međuzbir: 78 RSD
Dostava: 400 RSD
UKUPNO ZA PLAĆANJE: 478 RSD

REKAPITULACIJA PO FORMATU:
9x13 cm: 2 kom
10x15 cm: 3 kom
UKUPNO FOTOGRAFIJA: 5

========================================
Način plaćanja: Plaćanje pouzećem
Rok isporuke: 2 do 7 radnih dana
Kontakt: +381 65 46 000 46, kontakt@fotoexpres.rs
Hvala na poverenju!
========================================
";

fn render(
    contact: &ContactInfo,
    specs: &[PhotoSpec],
    discounts: &QuantityDiscountTable,
    promotion: Option<&Promotion>,
) -> String {
    let order_number: OrderNumber = create_test_order_number();
    let settings: StoreSettings = StoreSettings::default();
    let pricing: PricingResult = compute_pricing(
        specs,
        &create_test_prices(),
        discounts,
        promotion,
        &create_test_delivery(),
        create_test_now(),
    );
    format_order_summary(&SummaryInput {
        order_number: &order_number,
        contact,
        photo_specs: specs,
        pricing: &pricing,
        options: ProcessingOptions {
            crop_to_format: true,
            fill_white: false,
        },
        timestamp: create_test_now(),
        settings: &settings,
    })
}

#[test]
fn test_basic_summary_matches_exactly() {
    let text: String = render(
        &create_test_contact(),
        &create_test_specs(),
        &QuantityDiscountTable::empty(),
        None,
    );
    assert_eq!(text, EXPECTED_BASIC_SUMMARY);
}

#[test]
fn test_summary_is_reproducible() {
    let promotion: Promotion = create_test_promotion(PromotionScope::All, 10);
    let first: String = render(
        &create_test_contact(),
        &create_test_specs(),
        &QuantityDiscountTable::default(),
        Some(&promotion),
    );
    let second: String = render(
        &create_test_contact(),
        &create_test_specs(),
        &QuantityDiscountTable::default(),
        Some(&promotion),
    );
    assert_eq!(first, second);
}

#[test]
fn test_address_lines_are_separate_and_labelled() {
    let contact: ContactInfo = ContactInfo {
        street: String::from("Njegoševa 7\nstan 3"),
        ..create_test_contact()
    };
    let text: String = render(
        &contact,
        &create_test_specs(),
        &QuantityDiscountTable::empty(),
        None,
    );

    let street_lines: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with(&format!("{LABEL_STREET}: ")))
        .collect();
    assert_eq!(street_lines, vec!["Ulica: Njegoševa 7 stan 3"]);
    assert!(text.lines().any(|line| line == format!("{LABEL_POSTAL_CODE}: 11000")));
    assert!(text.lines().any(|line| line == format!("{LABEL_CITY}: Beograd")));
}

#[test]
fn test_blank_notes_render_placeholder() {
    let contact: ContactInfo = ContactInfo {
        notes: None,
        ..create_test_contact()
    };
    let text: String = render(
        &contact,
        &create_test_specs(),
        &QuantityDiscountTable::empty(),
        None,
    );
    assert!(text.contains("\nNapomena: Nema\n"));
}

#[test]
fn test_quantity_discount_line_explains_tier() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("a.jpg", "10x15", "mat", 120)];
    let text: String = render(
        &create_test_contact(),
        &specs,
        &QuantityDiscountTable::default(),
        None,
    );

    assert!(text.contains("\nPopust na količinu (10%): -216 RSD\n"));
    assert!(text.contains("Porudžbina sadrži 120 fotografija, što dostiže prag od 100 fotografija."));
    assert!(!text.contains("Promotivni popust"));
    assert!(!text.contains("Ukupan popust"));
}

#[test]
fn test_both_discounts_show_combined_total() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("a.jpg", "10x15", "mat", 120)];
    let promotion: Promotion = create_test_promotion(PromotionScope::All, 10);
    let text: String = render(
        &create_test_contact(),
        &specs,
        &QuantityDiscountTable::default(),
        Some(&promotion),
    );

    assert!(text.contains("\nPromotivni popust (10%): -216 RSD\n"));
    assert!(text.contains("\nUkupan popust: -432 RSD\n"));
    assert!(text.contains("\nUKUPNO ZA PLAĆANJE: 2128 RSD\n"));
}

#[test]
fn test_scoped_promotion_names_format() {
    let promotion: Promotion =
        create_test_promotion(PromotionScope::Format(String::from("10x15")), 20);
    let text: String = render(
        &create_test_contact(),
        &create_test_specs(),
        &QuantityDiscountTable::empty(),
        Some(&promotion),
    );
    assert!(text.contains("\nPromotivni popust (20% na format 10x15 cm): -11 RSD\n"));
}

#[test]
fn test_free_delivery_is_explicit() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("a.jpg", "10x15", "mat", 300)];
    let text: String = render(
        &create_test_contact(),
        &specs,
        &QuantityDiscountTable::empty(),
        None,
    );
    assert!(text.contains("\nDostava: BESPLATNA (iznos porudžbine dostiže 5000 RSD)\n"));
    assert!(text.contains("\nUKUPNO ZA PLAĆANJE: 5400 RSD\n"));
}

#[test]
fn test_missing_price_is_marked() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("a.jpg", "50x70", "mat", 1)];
    let text: String = render(
        &create_test_contact(),
        &specs,
        &QuantityDiscountTable::empty(),
        None,
    );
    assert!(text.contains("\nCena po komadu: 0 RSD (cena nije podešena)\n"));
}

#[test]
fn test_format_recap_totals_prints_per_format() {
    let specs: Vec<PhotoSpec> = vec![
        PhotoSpec::new("a.jpg", "10x15", "mat", 2),
        PhotoSpec::new("b.jpg", "9x13", "sjajni", 1),
        PhotoSpec::new("c.jpg", "10x15", "sjajni", 4),
    ];
    let text: String = render(
        &create_test_contact(),
        &specs,
        &QuantityDiscountTable::empty(),
        None,
    );
    assert!(text.contains("REKAPITULACIJA PO FORMATU:\n10x15 cm: 6 kom\n9x13 cm: 1 kom\nUKUPNO FOTOGRAFIJA: 7\n"));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ContactInfo, DomainError, PhotoSpec, PriceTable, Promotion, PromotionScope,
    QuantityDiscountTable, StoreSettings, validate_contact_info, validate_file_name,
    validate_photo_specs, validate_price_table, validate_promotion, validate_quantity_discounts,
    validate_store_settings,
};

fn create_test_contact() -> ContactInfo {
    ContactInfo::new(
        "Petar Petrović",
        "petar@example.com",
        "+381 64 111 2222",
        "Bulevar 12",
        "21000",
        "Novi Sad",
        None,
    )
}

#[test]
fn test_validate_contact_info_accepts_complete_contact() {
    let contact: ContactInfo = create_test_contact();
    assert!(validate_contact_info(&contact).is_ok());
}

#[test]
fn test_validate_contact_info_rejects_blank_city() {
    let contact: ContactInfo = ContactInfo {
        city: String::from("  "),
        ..create_test_contact()
    };
    let result: Result<(), DomainError> = validate_contact_info(&contact);
    assert!(matches!(
        result,
        Err(DomainError::InvalidContactField { field: "city", .. })
    ));
}

#[test]
fn test_validate_contact_info_rejects_malformed_email() {
    for email in ["petar", "@example.com", "petar@"] {
        let contact: ContactInfo = ContactInfo {
            email: email.to_string(),
            ..create_test_contact()
        };
        let result: Result<(), DomainError> = validate_contact_info(&contact);
        assert!(matches!(
            result,
            Err(DomainError::InvalidContactField { field: "email", .. })
        ));
    }
}

#[test]
fn test_validate_file_name() {
    assert!(validate_file_name("IMG_0001.jpg").is_ok());
    assert!(validate_file_name("moja slika (1).png").is_ok());
    assert!(validate_file_name("").is_err());
    assert!(validate_file_name("../secret").is_err());
    assert!(validate_file_name("dir/a.jpg").is_err());
    assert!(validate_file_name("dir\\a.jpg").is_err());
}

#[test]
fn test_validate_photo_specs_rejects_empty_order() {
    let result: Result<(), DomainError> = validate_photo_specs(&[]);
    assert_eq!(result, Err(DomainError::EmptyOrder));
}

#[test]
fn test_validate_photo_specs_rejects_zero_quantity() {
    let specs: Vec<PhotoSpec> = vec![
        PhotoSpec::new("a.jpg", "10x15", "mat", 1),
        PhotoSpec::new("b.jpg", "10x15", "mat", 0),
    ];
    let result: Result<(), DomainError> = validate_photo_specs(&specs);
    assert!(matches!(
        result,
        Err(DomainError::InvalidPhotoSpec { index: 1, .. })
    ));
}

#[test]
fn test_validate_photo_specs_rejects_unusable_segments() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("a.jpg", "10x15", "../", 1)];
    assert!(validate_photo_specs(&specs).is_err());

    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("../a.jpg", "10x15", "mat", 1)];
    assert!(validate_photo_specs(&specs).is_err());
}

#[test]
fn test_validate_price_table_requires_safe_keys() {
    assert!(validate_price_table(&PriceTable::default()).is_ok());

    let prices: PriceTable = PriceTable::new([("10X15", 18_u64)]);
    assert!(matches!(
        validate_price_table(&prices),
        Err(DomainError::InvalidFormatKey(_))
    ));

    let prices: PriceTable = PriceTable::new([("../x", 18_u64)]);
    assert!(validate_price_table(&prices).is_err());
}

#[test]
fn test_validate_quantity_discounts() {
    assert!(validate_quantity_discounts(&QuantityDiscountTable::default()).is_ok());

    let zero: QuantityDiscountTable = QuantityDiscountTable::new([(0, 5)]);
    assert_eq!(
        validate_quantity_discounts(&zero),
        Err(DomainError::InvalidDiscountThreshold(0))
    );

    let too_much: QuantityDiscountTable = QuantityDiscountTable::new([(10, 101)]);
    assert!(matches!(
        validate_quantity_discounts(&too_much),
        Err(DomainError::InvalidPercent { value: 101, .. })
    ));
}

#[test]
fn test_validate_promotion() {
    assert!(validate_promotion(&Promotion::default()).is_ok());

    let bad_expiry: Promotion = Promotion {
        valid_until: String::from("31.12.2025"),
        ..Promotion::default()
    };
    assert!(matches!(
        validate_promotion(&bad_expiry),
        Err(DomainError::InvalidPromotionExpiry { .. })
    ));

    let bad_scope: Promotion = Promotion {
        format: PromotionScope::Format(String::from("10 x 15")),
        ..Promotion::default()
    };
    assert!(validate_promotion(&bad_scope).is_err());
}

#[test]
fn test_validate_store_settings() {
    assert!(validate_store_settings(&StoreSettings::default()).is_ok());

    let settings: StoreSettings = StoreSettings {
        currency: String::new(),
        ..StoreSettings::default()
    };
    assert!(matches!(
        validate_store_settings(&settings),
        Err(DomainError::InvalidStoreSetting {
            field: "currency",
            ..
        })
    ));
}

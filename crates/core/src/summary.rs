// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The human-readable order recap written as `order_details.txt`.
//!
//! The recap is the canonical record of what was charged and why. Consumers
//! parse it line by line using the labels exported from this module, so the
//! label strings and section order must not change. Output depends only on
//! the inputs: the same input always renders byte-identical text.

use crate::pricing::{LinePricing, PricingResult};
use fotoexpres_domain::{
    ContactInfo, OrderNumber, PhotoSpec, ProcessingOptions, PromotionScope, StoreSettings,
};
use std::fmt::{self, Display, Formatter};
use time::OffsetDateTime;
use time::macros::format_description;

/// Header line carrying the order number.
pub const LABEL_ORDER_NUMBER: &str = "PORUDŽBINA";
/// Header line carrying the order timestamp.
pub const LABEL_DATE: &str = "DATUM";
/// Customer section header.
pub const SECTION_CUSTOMER: &str = "PODACI O KUPCU";
/// Customer name label.
pub const LABEL_FULL_NAME: &str = "Ime i prezime";
/// Customer email label.
pub const LABEL_EMAIL: &str = "Email";
/// Customer phone label.
pub const LABEL_PHONE: &str = "Telefon";
/// Street label; always on its own line.
pub const LABEL_STREET: &str = "Ulica";
/// Postal code label; always on its own line.
pub const LABEL_POSTAL_CODE: &str = "Poštanski broj";
/// City label; always on its own line.
pub const LABEL_CITY: &str = "Grad";
/// Customer notes label.
pub const LABEL_NOTES: &str = "Napomena";
/// Processing options section header.
pub const SECTION_PROCESSING: &str = "OPCIJE OBRADE";
/// Crop option label.
pub const LABEL_CROP: &str = "Kropovati fotografiju kako bi je prilagodili formatu";
/// Fill-white option label.
pub const LABEL_FILL_WHITE: &str = "Popunite belim";
/// Itemized photo section header.
pub const SECTION_PHOTOS: &str = "FOTOGRAFIJE";
/// Price recap section header.
pub const SECTION_PRICING: &str = "OBRAČUN";
/// Subtotal label.
pub const LABEL_SUBTOTAL: &str = "Međuzbir";
/// Quantity discount label.
pub const LABEL_QUANTITY_DISCOUNT: &str = "Popust na količinu";
/// Promotion discount label.
pub const LABEL_PROMOTION_DISCOUNT: &str = "Promotivni popust";
/// Combined discount label, shown only when both discounts apply.
pub const LABEL_TOTAL_DISCOUNT: &str = "Ukupan popust";
/// Delivery label.
pub const LABEL_DELIVERY: &str = "Dostava";
/// Grand total label.
pub const LABEL_GRAND_TOTAL: &str = "UKUPNO ZA PLAĆANJE";
/// Per-format recap section header.
pub const SECTION_FORMAT_RECAP: &str = "REKAPITULACIJA PO FORMATU";
/// Total physical prints label.
pub const LABEL_TOTAL_PHOTOS: &str = "UKUPNO FOTOGRAFIJA";
/// Payment method label.
pub const LABEL_PAYMENT: &str = "Način plaćanja";
/// Delivery lead time label.
pub const LABEL_LEAD_TIME: &str = "Rok isporuke";

const RULE: &str = "========================================";
const ITEM_SEPARATOR: &str = "---";

/// Everything the recap is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    /// The order number.
    pub order_number: &'a OrderNumber,
    /// The customer's contact information.
    pub contact: &'a ContactInfo,
    /// The order's photo specifications.
    pub photo_specs: &'a [PhotoSpec],
    /// The order's computed pricing.
    pub pricing: &'a PricingResult,
    /// The customer's processing choices.
    pub options: ProcessingOptions,
    /// The order timestamp printed in the header.
    pub timestamp: OffsetDateTime,
    /// Store settings supplying the currency and footer text.
    pub settings: &'a StoreSettings,
}

/// Renders the order recap.
///
/// # Arguments
///
/// * `input` - The order data and pricing to render
///
/// # Returns
///
/// The recap text. Identical input always yields identical text.
#[must_use]
pub fn format_order_summary(input: &SummaryInput<'_>) -> String {
    OrderSummary(input).to_string()
}

struct OrderSummary<'a, 'b>(&'a SummaryInput<'b>);

impl Display for OrderSummary<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let input: &SummaryInput<'_> = self.0;
        write_header(f, input)?;
        write_customer(f, input.contact)?;
        write_processing(f, input.options)?;
        write_photos(f, input)?;
        write_pricing(f, input)?;
        write_format_recap(f, input)?;
        write_footer(f, input.settings)
    }
}

fn write_header(f: &mut Formatter<'_>, input: &SummaryInput<'_>) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "{LABEL_ORDER_NUMBER}: {}", input.order_number)?;
    writeln!(f, "{LABEL_DATE}: {}", format_timestamp(input.timestamp))?;
    writeln!(f, "{RULE}")?;
    writeln!(f)
}

fn write_customer(f: &mut Formatter<'_>, contact: &ContactInfo) -> fmt::Result {
    writeln!(f, "{SECTION_CUSTOMER}:")?;
    writeln!(f, "{LABEL_FULL_NAME}: {}", single_line(&contact.full_name))?;
    writeln!(f, "{LABEL_EMAIL}: {}", single_line(&contact.email))?;
    writeln!(f, "{LABEL_PHONE}: {}", single_line(&contact.phone))?;
    writeln!(f, "{LABEL_STREET}: {}", single_line(&contact.street))?;
    writeln!(f, "{LABEL_POSTAL_CODE}: {}", single_line(&contact.postal_code))?;
    writeln!(f, "{LABEL_CITY}: {}", single_line(&contact.city))?;
    writeln!(
        f,
        "{LABEL_NOTES}: {}",
        contact.notes().map_or_else(|| String::from("Nema"), single_line)
    )?;
    writeln!(f)
}

fn write_processing(f: &mut Formatter<'_>, options: ProcessingOptions) -> fmt::Result {
    writeln!(f, "{SECTION_PROCESSING}:")?;
    writeln!(f, "{LABEL_CROP}: {}", yes_no(options.crop_to_format))?;
    writeln!(f, "{LABEL_FILL_WHITE}: {}", yes_no(options.fill_white))?;
    writeln!(f)
}

fn write_photos(f: &mut Formatter<'_>, input: &SummaryInput<'_>) -> fmt::Result {
    let currency: &str = &input.settings.currency;
    writeln!(f, "{SECTION_PHOTOS}:")?;
    for (position, line) in input.pricing.lines.iter().enumerate() {
        write_photo_line(f, position + 1, line, currency)?;
    }
    writeln!(f)
}

fn write_photo_line(
    f: &mut Formatter<'_>,
    position: usize,
    line: &LinePricing,
    currency: &str,
) -> fmt::Result {
    writeln!(f, "{ITEM_SEPARATOR}")?;
    writeln!(f, "Fotografija {position}: {}", single_line(&line.file_name))?;
    writeln!(f, "Format: {} cm", single_line(&line.format))?;
    writeln!(f, "Papir: {}", capitalize(&single_line(&line.finish)))?;
    writeln!(f, "Količina: {}", line.quantity)?;
    if line.price_missing {
        writeln!(f, "Cena po komadu: 0 {currency} (cena nije podešena)")?;
    } else {
        writeln!(f, "Cena po komadu: {} {currency}", line.unit_price)?;
    }
    writeln!(f, "Ukupno: {} {currency}", line.line_total)
}

fn write_pricing(f: &mut Formatter<'_>, input: &SummaryInput<'_>) -> fmt::Result {
    let pricing: &PricingResult = input.pricing;
    let currency: &str = &input.settings.currency;

    writeln!(f, "{SECTION_PRICING}:")?;
    writeln!(f, "{LABEL_SUBTOTAL}: {} {currency}", pricing.subtotal)?;

    if pricing.quantity_discount_amount > 0 {
        writeln!(
            f,
            "{LABEL_QUANTITY_DISCOUNT} ({}%): -{} {currency}",
            pricing.quantity_discount_percent, pricing.quantity_discount_amount
        )?;
        if let Some(threshold) = pricing.quantity_discount_threshold {
            writeln!(
                f,
                "  Porudžbina sadrži {} fotografija, što dostiže prag od {threshold} fotografija.",
                pricing.total_photos
            )?;
        }
    }

    if pricing.promotion_discount_amount > 0 {
        let scope: String = match &pricing.promotion_scope {
            Some(PromotionScope::Format(format)) => format!(" na format {format} cm"),
            _ => String::new(),
        };
        writeln!(
            f,
            "{LABEL_PROMOTION_DISCOUNT} ({}%{scope}): -{} {currency}",
            pricing.promotion_discount_percent, pricing.promotion_discount_amount
        )?;
    }

    if pricing.applied_discount_count() > 1 {
        writeln!(
            f,
            "{LABEL_TOTAL_DISCOUNT}: -{} {currency}",
            pricing.total_discount()
        )?;
    }

    if pricing.free_delivery {
        writeln!(
            f,
            "{LABEL_DELIVERY}: BESPLATNA (iznos porudžbine dostiže {} {currency})",
            pricing.free_delivery_limit
        )?;
    } else {
        writeln!(f, "{LABEL_DELIVERY}: {} {currency}", pricing.delivery_fee)?;
    }

    writeln!(f, "{LABEL_GRAND_TOTAL}: {} {currency}", pricing.grand_total)?;
    writeln!(f)
}

fn write_format_recap(f: &mut Formatter<'_>, input: &SummaryInput<'_>) -> fmt::Result {
    writeln!(f, "{SECTION_FORMAT_RECAP}:")?;
    for (format, count) in prints_per_format(input.photo_specs) {
        writeln!(f, "{} cm: {count} kom", single_line(format))?;
    }
    writeln!(f, "{LABEL_TOTAL_PHOTOS}: {}", input.pricing.total_photos)?;
    writeln!(f)
}

fn write_footer(f: &mut Formatter<'_>, settings: &StoreSettings) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "{LABEL_PAYMENT}: {}", single_line(&settings.payment_method))?;
    writeln!(
        f,
        "{LABEL_LEAD_TIME}: {}",
        single_line(&settings.delivery_lead_time)
    )?;
    writeln!(
        f,
        "Kontakt: {}, {}",
        single_line(&settings.contact_phone),
        single_line(&settings.contact_email)
    )?;
    writeln!(f, "Hvala na poverenju!")?;
    writeln!(f, "{RULE}")
}

/// Total physical prints per format, in order of first appearance.
fn prints_per_format(specs: &[PhotoSpec]) -> Vec<(&str, u32)> {
    let mut totals: Vec<(&str, u32)> = Vec::new();
    for spec in specs {
        match totals
            .iter_mut()
            .find(|(format, _)| *format == spec.format.as_str())
        {
            Some((_, count)) => *count = count.saturating_add(spec.quantity),
            None => totals.push((spec.format.as_str(), spec.quantity)),
        }
    }
    totals
}

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| timestamp.to_string())
}

const fn yes_no(value: bool) -> &'static str {
    if value { "DA" } else { "NE" }
}

/// Collapses line breaks so a value cannot start a new labelled line.
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

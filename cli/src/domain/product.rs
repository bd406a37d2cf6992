//! Base product resolution.
//!
//! A valid installation needs exactly one installable base product. The
//! profile names it in `software/products`; the catalog says what the
//! installation media actually offers.

use serde::Deserialize;
use serde_yaml::Value;

use crate::domain::profile::ProfileDocument;

/// An installable base product known to the installation media.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseProduct {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

/// Resolve the base product the profile targets.
///
/// An explicit `software/products` entry must match a catalog product by
/// name. A profile that names none selects the sole available product when
/// the catalog has exactly one; anything else is unresolvable.
#[must_use]
pub fn select_base_product<'a>(
    doc: &ProfileDocument,
    available: &'a [BaseProduct],
) -> Option<&'a BaseProduct> {
    let named = doc
        .get("software")
        .and_then(|software| software.get("products"))
        .and_then(Value::as_sequence)
        .and_then(|products| products.first())
        .and_then(Value::as_str);

    match named {
        Some(name) => available.iter().find(|product| product.name == name),
        None if available.len() == 1 => available.first(),
        None => None,
    }
}

/// Terminal error text enumerating every available base product.
///
/// Produced even when the catalog is empty, so the operator always sees
/// what the media offers.
#[must_use]
pub fn missing_product_report(available: &[BaseProduct]) -> String {
    let mut message = String::from(
        "No installable base product could be determined from the profile.\n\
         Check the <products/> entry in the <software/> section.\n\
         The following base products are available:\n",
    );
    if available.is_empty() {
        message.push_str("  (none)\n");
    }
    for product in available {
        if product.display_name.is_empty() {
            message.push_str(&format!("  {}\n", product.name));
        } else {
            message.push_str(&format!("  {} ({})\n", product.name, product.display_name));
        }
    }
    message
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical keys in the order reports list them.
pub const DISPLAY_ORDER: &[&str] = &[
    "material",
    "reference",
    "batch",
    "qty/uom",
    "production date",
    "country",
];

/// Alternative spellings folded onto one canonical key.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("lot", "batch"),
    ("lot no", "batch"),
    ("batch no", "batch"),
    ("batch number", "batch"),
    ("lot number", "batch"),
    ("reference no", "reference"),
    ("customer reference no", "reference"),
    ("our/customer reference no", "reference"),
    ("quantity", "qty/uom"),
    ("date of production", "production date"),
    ("country of origin", "country"),
];

/// One metadata field as it appeared in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// Parsed `Qty / Uom` value such as `2,205.000 /LB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: String,
}

/// Field name to value mapping extracted from a COA.
///
/// Lookups fold the key to a canonical form, so `Qty / Uom` and `Qty/Uom`
/// address the same entry. Stored entries keep their original casing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, MetadataEntry>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Empty keys or values are ignored.
    pub fn insert(&mut self, key: &str, value: &str) -> Option<MetadataEntry> {
        let display_key = collapse_whitespace(key.trim().trim_end_matches(':'));
        let value = collapse_whitespace(value);
        if display_key.is_empty() || value.is_empty() {
            return None;
        }

        self.entries.insert(
            canonical_key(&display_key),
            MetadataEntry {
                key: display_key,
                value,
            },
        )
    }

    /// Insert only when the canonical key is not yet present.
    pub fn insert_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.contains_key(key) {
            return false;
        }
        self.insert(key, value);
        self.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|entry| entry.value.as_str())
    }

    pub fn entry(&self, key: &str) -> Option<&MetadataEntry> {
        self.entries.get(&canonical_key(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&canonical_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.entries.values()
    }

    /// Entries in report order: well-known fields first, the rest by key.
    pub fn ordered(&self) -> Vec<&MetadataEntry> {
        let mut ordered: Vec<&MetadataEntry> = DISPLAY_ORDER
            .iter()
            .filter_map(|key| self.entries.get(*key))
            .collect();

        ordered.extend(
            self.entries
                .iter()
                .filter(|(key, _)| !DISPLAY_ORDER.contains(&key.as_str()))
                .map(|(_, entry)| entry),
        );

        ordered
    }

    /// First token of the Material field, e.g. `D14924998`.
    pub fn material_id(&self) -> Option<&str> {
        self.get("material")?.split_whitespace().next()
    }

    pub fn batch(&self) -> Option<&str> {
        self.get("batch")
    }

    pub fn quantity(&self) -> Option<Quantity> {
        Quantity::parse(self.get("qty/uom")?)
    }
}

impl Quantity {
    /// Accepts `2,205.000 /LB`, `2205 / LB` and `25 KG`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (amount, unit) = match raw.split_once('/') {
            Some((amount, unit)) => (amount, unit),
            None => raw.trim().split_once(char::is_whitespace)?,
        };

        let amount: f64 = amount.trim().replace(',', "").parse().ok()?;
        let unit = unit.trim();
        if unit.is_empty() || !amount.is_finite() {
            return None;
        }

        Some(Self {
            amount,
            unit: unit.to_string(),
        })
    }
}

/// Fold a metadata key for lookup.
///
/// Lowercases, collapses whitespace, removes spaces around `/`, strips a
/// trailing `:` or `.` and resolves known aliases.
pub fn canonical_key(key: &str) -> String {
    let lowered = collapse_whitespace(&key.to_lowercase());
    let folded = lowered
        .replace(" /", "/")
        .replace("/ ", "/")
        .trim_end_matches([':', '.'])
        .trim()
        .to_string();

    KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(folded)
}

/// Trim and replace internal whitespace runs with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key_folding() {
        assert_eq!(canonical_key("Qty / Uom"), "qty/uom");
        assert_eq!(canonical_key("  QTY/UOM: "), "qty/uom");
        assert_eq!(canonical_key("Our/Customer Reference No"), "reference");
        assert_eq!(canonical_key("Lot No."), "batch");
        assert_eq!(canonical_key("Batch  Number"), "batch");
        assert_eq!(canonical_key("LOT NUMBER"), "batch");
        assert_eq!(canonical_key("Material"), "material");
    }

    #[test]
    fn test_insert_ignores_empty_fields() {
        let mut metadata = Metadata::new();
        assert!(metadata.insert("Batch", "   ").is_none());
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_insert_if_absent_keeps_first_value() {
        let mut metadata = Metadata::new();
        assert!(metadata.insert_if_absent("Batch", "241226D257"));
        assert!(!metadata.insert_if_absent("Lot", "OTHER"));
        assert_eq!(metadata.batch(), Some("241226D257"));
    }

    #[test]
    fn test_ordered_puts_known_fields_first() {
        let mut metadata = Metadata::new();
        metadata.insert("Delivery", "80012345");
        metadata.insert("Batch", "241226D257");
        metadata.insert("Material", "D14924998 NEOPRENE");

        let keys: Vec<&str> = metadata.ordered().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Material", "Batch", "Delivery"]);
        assert_eq!(metadata.material_id(), Some("D14924998"));
    }

    #[test]
    fn test_quantity_parsing() {
        let quantity = Quantity::parse("2,205.000 /LB").unwrap();
        assert_eq!(quantity.amount, 2205.0);
        assert_eq!(quantity.unit, "LB");

        let quantity = Quantity::parse("25 KG").unwrap();
        assert_eq!(quantity.amount, 25.0);
        assert_eq!(quantity.unit, "KG");

        assert!(Quantity::parse("n/a").is_none());
    }
}

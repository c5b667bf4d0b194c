//! Metadata Extractor
//!
//! Pulls material, batch, reference and quantity fields out of
//! Metadata-classified lines. Handles both `Key: value` lines and the
//! split-field layout where the key sits alone on one line and the value on
//! the next (`Batch` / `241226D257`).

use coacheck_models::{canonical_key, ClassifiedLine, LineKind, Metadata, TestRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Canonical keys that may appear alone on a line with the value below.
pub const SPLIT_KEYS: &[&str] = &["batch", "qty/uom", "material", "delivery", "date"];

/// Informational rows copied into metadata: (row name, metadata key).
const INFORMATIONAL_FIELDS: &[(&str, &str)] = &[
    ("date of production", "Production Date"),
    ("country of origin", "Country"),
];

const MAX_KEY_WORDS: usize = 6;

static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][\w /.#&'()\-]*?)\s*:\s*(\S.*?)$").expect("key/value pattern is valid")
});

static INLINE_BATCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(batch|lot)(?:\s*(?:no\.?|number|#))?\s+((?-i:[0-9A-Z]{4,}))$")
        .expect("inline batch pattern is valid")
});

/// Split `Key: value` (or `Batch 241226D257`) into its parts.
pub fn key_value(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();

    if let Some(caps) = KEY_VALUE.captures(line) {
        let key = caps.get(1)?.as_str();
        if key.split_whitespace().count() <= MAX_KEY_WORDS {
            return Some((key, caps.get(2)?.as_str()));
        }
    }

    // Batch codes carry at least one digit; `BATCH NUMBER` is a key alone.
    INLINE_BATCH
        .captures(line)
        .and_then(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .filter(|(_, value)| value.chars().any(|c| c.is_ascii_digit()))
}

/// A line holding only a split-field key such as `Qty / Uom`.
pub fn is_split_key(line: &str) -> bool {
    let line = line.trim();
    line.len() <= 40 && SPLIT_KEYS.contains(&canonical_key(line).as_str())
}

/// Row names that carry document facts rather than measurements.
pub fn is_informational_name(name: &str) -> bool {
    let name = canonical_key(name);
    INFORMATIONAL_FIELDS.iter().any(|(row, _)| name == canonical_key(row))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, lines: &[ClassifiedLine<'_>]) -> Metadata {
        let mut metadata = Metadata::new();
        self.extract_into(&mut metadata, lines);
        metadata
    }

    /// Add fields from `lines` to `metadata`. Fields already present win.
    pub fn extract_into(&self, metadata: &mut Metadata, lines: &[ClassifiedLine<'_>]) {
        let mut pending_key: Option<&str> = None;

        for line in lines.iter().filter(|l| l.kind == LineKind::Metadata) {
            let text = line.text.trim();

            if let Some((key, value)) = key_value(text) {
                pending_key = None;
                if metadata.insert_if_absent(key, value) {
                    debug!(line = line.number, key = %key, "metadata field");
                }
                continue;
            }

            if is_split_key(text) {
                pending_key = Some(text);
                continue;
            }

            match pending_key.take() {
                Some(key) => {
                    if metadata.insert_if_absent(key, text) {
                        debug!(line = line.number, key = %key, "split metadata field");
                    }
                }
                None => debug!(line = line.number, "metadata value without key"),
            }
        }
    }

    /// Copy informational rows (production date, country of origin) into
    /// metadata. The rows stay in the report as well.
    pub fn absorb_informational<'a>(
        &self,
        metadata: &mut Metadata,
        records: impl IntoIterator<Item = &'a TestRecord>,
    ) {
        for record in records.into_iter().filter(|r| r.is_informational()) {
            let name = canonical_key(&record.name);
            if let Some((_, key)) = INFORMATIONAL_FIELDS.iter().find(|(row, _)| {
                name == canonical_key(row)
            }) {
                metadata.insert_if_absent(key, &record.raw_value);
            }
        }
    }
}

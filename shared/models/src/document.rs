use serde::{Deserialize, Serialize};

/// Marker line that starts a new certificate inside a multi-COA document.
pub const SECTION_MARKER: &str = "CERTIFICATE OF ANALYSIS";

/// Raw COA text as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    lines: Vec<String>,
}

/// Contiguous run of lines belonging to one certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// Zero-based index of the first line within the document.
    pub start: usize,
    pub lines: &'a [String],
}

/// Classification assigned to a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Metadata,
    Header,
    Row,
    Blank,
    Unknown,
}

/// A line together with its classification. `number` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub number: usize,
    pub text: &'a str,
    pub kind: LineKind,
}

impl Document {
    /// Split text on `\n`, dropping the `\r` of CRLF line endings.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self { lines }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when the document has no line with visible content.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Keep at most `max_lines` lines. Returns whether anything was cut.
    pub fn truncate(self, max_lines: usize) -> (Self, bool) {
        if self.lines.len() <= max_lines {
            return (self, false);
        }

        let mut lines = self.lines;
        lines.truncate(max_lines);
        (Self { lines }, true)
    }

    /// Split at every line containing [`SECTION_MARKER`] (case-insensitive).
    ///
    /// The marker line opens its section. Lines before the first marker form
    /// their own section only if one of them has content.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let starts: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.to_uppercase().contains(SECTION_MARKER))
            .map(|(idx, _)| idx)
            .collect();

        if starts.is_empty() {
            return vec![Section {
                start: 0,
                lines: &self.lines,
            }];
        }

        let mut sections = Vec::with_capacity(starts.len() + 1);

        let preamble = &self.lines[..starts[0]];
        if preamble.iter().any(|line| !line.trim().is_empty()) {
            sections.push(Section {
                start: 0,
                lines: preamble,
            });
        }

        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(self.lines.len());
            sections.push(Section {
                start,
                lines: &self.lines[start..end],
            });
        }

        sections
    }

    /// SHA-256 of the lines joined with `\n`, hex encoded.
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                hasher.update(b"\n");
            }
            hasher.update(line.as_bytes());
        }

        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_lines_are_normalized() {
        let doc = Document::from_text("Batch\r\n241226D257\r\n");
        assert_eq!(doc.lines(), &["Batch", "241226D257", ""]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let doc = Document::from_text("");
        assert!(doc.is_empty());
        assert!(doc.is_blank());
    }

    #[test]
    fn test_sections_split_on_marker() {
        let doc = Document::from_text(
            "Supplier letterhead\nCERTIFICATE OF ANALYSIS\nA\nCertificate of Analysis\nB",
        );
        let sections = doc.sections();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].lines, &["Supplier letterhead"]);
        assert_eq!(sections[1].start, 1);
        assert_eq!(sections[2].lines, &["Certificate of Analysis", "B"]);
    }

    #[test]
    fn test_blank_preamble_is_dropped() {
        let doc = Document::from_text("\n  \nCERTIFICATE OF ANALYSIS\nA");
        let sections = doc.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start, 2);
    }

    #[test]
    fn test_truncate_reports_cut() {
        let (doc, cut) = Document::from_text("a\nb\nc").truncate(2);
        assert!(cut);
        assert_eq!(doc.len(), 2);

        let (doc, cut) = doc.truncate(10);
        assert!(!cut);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_digest_is_stable() {
        let a = Document::from_text("x\ny");
        let b = Document::from_lines(["x", "y"]);
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }
}

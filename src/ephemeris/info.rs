//! Sectioned information table describing one body at one instant

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EphemerisCell, EphemerisValue, FormatHint};

/// A labelled value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoRow {
    pub label: String,
    pub value: EphemerisCell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoSection {
    pub title: String,
    pub rows: Vec<InfoRow>,
}

impl InfoSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Append a formatted value
    pub fn value(mut self, label: impl Into<String>, value: f64, hint: FormatHint) -> Self {
        self.rows.push(InfoRow {
            label: label.into(),
            value: EphemerisCell::Value(EphemerisValue::new(value, hint)),
        });
        self
    }

    /// Append a value only when it applies
    pub fn optional(self, label: impl Into<String>, value: Option<f64>, hint: FormatHint) -> Self {
        match value {
            Some(v) => self.value(label, v, hint),
            None => self,
        }
    }

    /// Append descriptive text
    pub fn text(self, label: impl Into<String>, text: impl Into<String>) -> Self {
        self.cell(label, EphemerisCell::Text(text.into()))
    }

    pub fn cell(mut self, label: impl Into<String>, value: EphemerisCell) -> Self {
        self.rows.push(InfoRow {
            label: label.into(),
            value,
        });
        self
    }

    pub fn get(&self, label: &str) -> Option<&EphemerisCell> {
        self.rows.iter().find(|r| r.label == label).map(|r| &r.value)
    }
}

/// Information about a body, grouped in titled sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoTable {
    pub title: String,
    pub sections: Vec<InfoSection>,
}

impl InfoTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section, skipping empty ones
    pub fn push(&mut self, section: InfoSection) {
        if !section.rows.is_empty() {
            self.sections.push(section);
        }
    }

    pub fn section(&self, title: &str) -> Option<&InfoSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Look a row up across every section
    pub fn get(&self, label: &str) -> Option<&EphemerisCell> {
        self.sections.iter().find_map(|s| s.get(label))
    }
}

impl fmt::Display for InfoTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "[{}]", section.title)?;
            let width = section.rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
            for row in &section.rows {
                writeln!(f, "  {:<width$}  {}", row.label, row.value, width = width)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let mut table = InfoTable::new("Venus");
        table.push(
            InfoSection::new("Visibility")
                .value("Magnitude", -4.2, FormatHint::Magnitude)
                .optional("Phase", None, FormatHint::Fraction)
                .cell("Rise", EphemerisCell::Unavailable),
        );
        table.push(InfoSection::new("Empty"));

        assert_eq!(table.sections.len(), 1);
        assert_eq!(table.get("Magnitude").and_then(|c| c.value()), Some(-4.2));
        assert_eq!(table.get("Rise"), Some(&EphemerisCell::Unavailable));
        assert!(table.get("Phase").is_none());
        assert!(table.section("Empty").is_none());

        let text = table.to_string();
        assert!(text.starts_with("Venus\n"));
        assert!(text.contains("[Visibility]"));
        assert!(text.contains("-4.20"));
    }
}

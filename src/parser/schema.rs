//! Data model for parsed margin dumps.
//!
//! A dump holds two CPU sections, each with a rank-margin and a lane-margin
//! table that share one variable (column) list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CPU socket a margin section belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cpu {
    Cpu0,
    Cpu1,
}

impl Cpu {
    pub const ALL: [Cpu; 2] = [Cpu::Cpu0, Cpu::Cpu1];

    pub fn index(self) -> u8 {
        match self {
            Cpu::Cpu0 => 0,
            Cpu::Cpu1 => 1,
        }
    }

    /// Row-label prefix for this CPU ("N0" / "N1")
    pub fn row_prefix(self) -> String {
        format!("N{}", self.index())
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPU{}", self.index())
    }
}

/// Category of margin measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarginType {
    Rank,
    Lane,
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginType::Rank => write!(f, "Rank Margin"),
            MarginType::Lane => write!(f, "Lane Margin"),
        }
    }
}

/// One of the four tables a dump produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarginKind {
    pub cpu: Cpu,
    pub margin_type: MarginType,
}

impl MarginKind {
    pub const ALL: [MarginKind; 4] = [
        MarginKind::new(Cpu::Cpu0, MarginType::Rank),
        MarginKind::new(Cpu::Cpu0, MarginType::Lane),
        MarginKind::new(Cpu::Cpu1, MarginType::Rank),
        MarginKind::new(Cpu::Cpu1, MarginType::Lane),
    ];

    pub const fn new(cpu: Cpu, margin_type: MarginType) -> Self {
        Self { cpu, margin_type }
    }

    /// Human title, e.g. "CPU0 Rank Margin"
    pub fn title(&self) -> String {
        format!("{} {}", self.cpu, self.margin_type)
    }

    /// Compact key used in file names, e.g. "CPU0RankMargin"
    pub fn key(&self) -> String {
        self.title().replace(' ', "")
    }
}

/// Ordered column names of a margin table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableList(Vec<String>);

impl VariableList {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tokens a well-formed row must have: label plus one per variable
    pub fn row_width(&self) -> usize {
        self.0.len() + 1
    }
}

/// A tokenized data line: label followed by one raw value per variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginRow {
    pub label: String,
    pub values: Vec<String>,
}

impl MarginRow {
    pub fn new(label: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// Build a row from whitespace tokens; the first token is the label
    pub fn from_tokens(mut tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }
        let label = tokens.remove(0);
        Some(Self::new(label, tokens))
    }

    /// Label followed by values, as written to the raw CSV sink
    pub fn to_record(&self) -> Vec<&str> {
        std::iter::once(self.label.as_str())
            .chain(self.values.iter().map(String::as_str))
            .collect()
    }
}

/// Rows of one margin type for one CPU of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarginTable {
    pub kind: MarginKind,
    pub rows: Vec<MarginRow>,
}

impl MarginTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Both tables of one CPU section plus their shared variable list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuMargins {
    pub cpu: Cpu,
    pub variables: VariableList,
    pub rank: MarginTable,
    pub lane: MarginTable,
}

impl CpuMargins {
    pub fn table(&self, margin_type: MarginType) -> &MarginTable {
        match margin_type {
            MarginType::Rank => &self.rank,
            MarginType::Lane => &self.lane,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_naming() {
        let kind = MarginKind::new(Cpu::Cpu1, MarginType::Lane);
        assert_eq!(kind.title(), "CPU1 Lane Margin");
        assert_eq!(kind.key(), "CPU1LaneMargin");
    }

    #[test]
    fn test_row_from_tokens() {
        let row = MarginRow::from_tokens(vec!["N0.C00".into(), "-3".into(), "4".into()]).unwrap();
        assert_eq!(row.label, "N0.C00");
        assert_eq!(row.values, vec!["-3", "4"]);
        assert_eq!(row.to_record(), vec!["N0.C00", "-3", "4"]);
        assert!(MarginRow::from_tokens(Vec::new()).is_none());
    }
}

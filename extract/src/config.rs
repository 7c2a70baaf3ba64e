//! Heuristic thresholds for the line scanners.
//!
//! Every bounded look-ahead, stop rule and row cap used by the extractors is
//! a named field here. Defaults are tuned against captured page dumps and can
//! be overridden from a YAML file; fields left out keep their default.
//!
//! # Example YAML
//!
//! ```yaml
//! value_window: 6
//! miss_run: 4
//! row_cap: 10
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_VALUE_WINDOW: usize = 5;
pub const DEFAULT_TREND_WINDOW: usize = 4;
pub const DEFAULT_PAIR_WINDOW: usize = 2;
pub const DEFAULT_MISS_RUN: usize = 3;
pub const DEFAULT_ROW_CAP: usize = 5;
pub const DEFAULT_SECTION_SPAN: usize = 30;
pub const DEFAULT_LABEL_MAX_CHARS: usize = 29;
pub const DEFAULT_SEQUENCE_SPAN: usize = 20;
pub const DEFAULT_FALLBACK_OFFSET: usize = 7;
pub const DEFAULT_CELL_MIN_CHARS: usize = 2;
pub const DEFAULT_CELL_MAX_CHARS: usize = 99;
pub const DEFAULT_DESCRIPTION_MIN_CHARS: usize = 50;
pub const DEFAULT_TERM_MAX_CHARS: usize = 49;
pub const DEFAULT_BREAKDOWN_SPAN: usize = 10;
pub const DEFAULT_PLATFORM_SPAN: usize = 20;

/// Scan bounds shared by the overview and referrals extractors.
///
/// # Examples
///
/// ```
/// use sitedump_extract::config::Thresholds;
///
/// let thresholds = Thresholds::from_yaml_str("row_cap: 10\n").unwrap();
/// assert_eq!(thresholds.row_cap, 10);
/// assert_eq!(thresholds.miss_run, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Lines scanned after a label for its scalar value.
    pub value_window: usize,
    /// Lines scanned after the total-visits label.
    pub trend_window: usize,
    /// Lines scanned after a table row label for its share value.
    pub pair_window: usize,
    /// Consecutive misses that end a reconstructed column.
    pub miss_run: usize,
    /// Maximum rows taken from one overview table.
    pub row_cap: usize,
    /// Maximum lines scanned for one overview table.
    pub section_span: usize,
    /// Longest candidate label accepted in label/percentage rows.
    pub label_max_chars: usize,
    /// Lines searched after the table header for the `1 2 3` sequence line.
    pub sequence_span: usize,
    /// Offset from the table header to the first data row when no sequence
    /// line is found.
    pub fallback_offset: usize,
    /// Shortest accepted secondary column cell.
    pub cell_min_chars: usize,
    /// Longest accepted secondary column cell.
    pub cell_max_chars: usize,
    /// Site descriptions must be longer than this.
    pub description_min_chars: usize,
    /// Longest accepted search term.
    pub term_max_chars: usize,
    /// Lines scanned after the organic search label for the brand split.
    pub breakdown_span: usize,
    /// Lines scanned after the social traffic label for platform shares.
    pub platform_span: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            value_window: DEFAULT_VALUE_WINDOW,
            trend_window: DEFAULT_TREND_WINDOW,
            pair_window: DEFAULT_PAIR_WINDOW,
            miss_run: DEFAULT_MISS_RUN,
            row_cap: DEFAULT_ROW_CAP,
            section_span: DEFAULT_SECTION_SPAN,
            label_max_chars: DEFAULT_LABEL_MAX_CHARS,
            sequence_span: DEFAULT_SEQUENCE_SPAN,
            fallback_offset: DEFAULT_FALLBACK_OFFSET,
            cell_min_chars: DEFAULT_CELL_MIN_CHARS,
            cell_max_chars: DEFAULT_CELL_MAX_CHARS,
            description_min_chars: DEFAULT_DESCRIPTION_MIN_CHARS,
            term_max_chars: DEFAULT_TERM_MAX_CHARS,
            breakdown_span: DEFAULT_BREAKDOWN_SPAN,
            platform_span: DEFAULT_PLATFORM_SPAN,
        }
    }
}

impl Thresholds {
    /// Loads thresholds from a YAML file and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`YamlError`](ConfigError::YamlError) if parsing fails, or
    /// [`InvalidThreshold`](ConfigError::InvalidThreshold) if a value is out
    /// of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let thresholds: Self = serde_yaml::from_reader(reader)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Parses thresholds from a YAML string and validates them.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let thresholds: Self = serde_yaml::from_str(yaml)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Saves the thresholds as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Rejects zero-width windows, caps and stop runs, and inverted cell
    /// length bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("value_window", self.value_window),
            ("trend_window", self.trend_window),
            ("pair_window", self.pair_window),
            ("miss_run", self.miss_run),
            ("row_cap", self.row_cap),
            ("section_span", self.section_span),
            ("label_max_chars", self.label_max_chars),
            ("sequence_span", self.sequence_span),
            ("cell_max_chars", self.cell_max_chars),
            ("term_max_chars", self.term_max_chars),
            ("breakdown_span", self.breakdown_span),
            ("platform_span", self.platform_span),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidThreshold(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        if self.cell_min_chars > self.cell_max_chars {
            return Err(ConfigError::InvalidThreshold(format!(
                "cell_min_chars ({}) exceeds cell_max_chars ({})",
                self.cell_min_chars, self.cell_max_chars
            )));
        }
        Ok(())
    }
}

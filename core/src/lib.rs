//! Core data model for recovering structure from flattened page dumps.
//!
//! A rendered analytics page loses its table layout when its visible text is
//! captured line by line. This crate defines the vocabulary the extractors
//! use to rebuild it:
//!
//! - [`LineSequence`]: the trimmed, non-empty lines of one dump.
//! - [`ValueShape`]: the closed set of value grammars (volumes, percentages,
//!   ranks, durations, ...).
//! - [`Column`], [`Table`], [`Record`]: column-wise recovery zipped into rows,
//!   with the row count fixed by the primary column.
//! - [`Overview`] and [`ReferralTable`]: the two extracted documents.
//!
//! Missing values are the [`SENTINEL`] `"-"`, never an error.
//!
//! # Example
//!
//! ```
//! use sitedump_core::*;
//!
//! let lines = LineSequence::from_raw("a.com\nb.net\n#12\n");
//! let domains: Vec<String> = lines
//!     .iter()
//!     .filter(|line| is_domain(line))
//!     .map(String::from)
//!     .collect();
//! let table = Table::assemble(Column::new("domain", domains), Vec::new());
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(ValueShape::Rank.find(lines.get(2).unwrap()), Some("#12"));
//! ```

mod lines;
mod shape;
mod table;
mod types;
mod validate;

pub use lines::LineSequence;
pub use shape::{ValueShape, is_domain, normalize_change, strip_counter_suffix};
pub use table::{Column, Record, Table};
pub use types::*;
pub use validate::{ValidationError, validate_overview, validate_referrals};

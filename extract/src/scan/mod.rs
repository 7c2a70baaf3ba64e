//! Pure forward scanners over a [`LineSequence`](sitedump_core::LineSequence).
//!
//! Every scanner takes the lines and a start index and returns its result
//! together with where it stopped. No cursor is shared between steps, so each
//! step can be exercised on its own:
//!
//! - [`locate`]: anchor lookup by exact line, leading keyword, substring or
//!   pattern.
//! - [`window_value`]: bounded look-ahead for a value shape after an anchor.
//! - [`scan_run`] / [`scan_until`]: column recovery with miss-run or
//!   stop-line boundaries.

mod column;
mod locate;
mod window;

pub use column::{ColumnScan, Verdict, scan_run, scan_until};
pub use locate::{Anchor, locate, locate_all, locate_either};
pub use window::{window_find, window_find_last, window_position, window_value};

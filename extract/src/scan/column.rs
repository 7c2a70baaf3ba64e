//! Column runs in a flattened table dump.
//!
//! A flattened widget lists every cell of its first column, then every cell
//! of the second, and so on. Each scanner here walks forward from a start
//! index, collects one column, and reports where it stopped so the next
//! column can pick up from there.

use sitedump_core::LineSequence;
use tracing::debug;

/// Cells collected for one column plus the index the next scan starts at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnScan {
    pub values: Vec<String>,
    pub end: usize,
}

impl ColumnScan {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Classification of one line by a column scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The line is a cell of this column.
    Take(String),
    /// The line is noise; keep scanning.
    Skip,
    /// The line belongs to the next column.
    Stop,
}

/// Collects a column whose boundary is a sustained run of misses.
///
/// Lines before the first hit are skipped. After it, the column ends once
/// `stop_run` consecutive lines fail `predicate`; isolated misses inside the
/// run are dropped as noise. The scan also stops after `cap` hits. `end` is
/// the index just past the last hit.
///
/// # Examples
///
/// ```
/// use sitedump_core::{LineSequence, is_domain};
/// use sitedump_extract::scan::scan_run;
///
/// let lines = LineSequence::from_raw("a.com\nad\nb.net\nShopping\nNews\n#12\n");
/// let scan = scan_run(&lines, 0, 3, usize::MAX, |line| {
///     is_domain(line).then(|| line.to_string())
/// });
/// assert_eq!(scan.values, vec!["a.com", "b.net"]);
/// assert_eq!(scan.end, 3);
/// ```
pub fn scan_run<F>(
    lines: &LineSequence,
    from: usize,
    stop_run: usize,
    cap: usize,
    predicate: F,
) -> ColumnScan
where
    F: Fn(&str) -> Option<String>,
{
    let mut values = Vec::new();
    let mut end = from;
    let mut misses = 0;

    for (index, line) in lines.iter().enumerate().skip(from) {
        match predicate(line) {
            Some(value) => {
                values.push(value);
                end = index + 1;
                misses = 0;
                if values.len() >= cap {
                    break;
                }
            }
            None if values.is_empty() => {}
            None => {
                misses += 1;
                if misses >= stop_run {
                    debug!(start = from, end, rows = values.len(), "Column run ended");
                    break;
                }
            }
        }
    }

    ColumnScan { values, end }
}

/// Collects a column cell by cell until `classify` says stop or `cap` cells
/// are taken.
///
/// `end` is the index of the stopping line, the index past the last taken
/// cell when the cap is reached, or the input length when the input runs out.
pub fn scan_until<F>(lines: &LineSequence, from: usize, cap: usize, mut classify: F) -> ColumnScan
where
    F: FnMut(&str) -> Verdict,
{
    let mut values = Vec::new();
    if cap == 0 {
        return ColumnScan { values, end: from };
    }

    for (index, line) in lines.iter().enumerate().skip(from) {
        match classify(line) {
            Verdict::Take(value) => {
                values.push(value);
                if values.len() >= cap {
                    return ColumnScan {
                        values,
                        end: index + 1,
                    };
                }
            }
            Verdict::Skip => {}
            Verdict::Stop => return ColumnScan { values, end: index },
        }
    }

    ColumnScan {
        values,
        end: lines.len().max(from),
    }
}

//! Rank selection over the volume-ordered record set.
//!
//! Selection happens here, before the layout engine sees the data; the
//! engine never filters.

use crate::records::AssetRecord;

/// Which slice of the volume-ranked records to lay out. Ranks are 1-based
/// and inclusive, the way a "rank 3 to 12" picker counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    /// The `n` highest-volume assets.
    Top(usize),
    /// Ranks `start` through `end`, clamped to the available range.
    Range { start: usize, end: usize },
}

impl Selection {
    pub fn apply<'a>(&self, records: &'a [AssetRecord]) -> &'a [AssetRecord] {
        match *self {
            Selection::All => records,
            Selection::Top(n) => &records[..n.min(records.len())],
            Selection::Range { start, end } => {
                let start = start.max(1) - 1;
                let end = end.min(records.len());
                if start >= end {
                    return &[];
                }
                &records[start..end]
            }
        }
    }
}

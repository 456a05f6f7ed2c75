use serde::{Deserialize, Serialize};

/// Width of every histogram bin, in years.
pub const BIN_WIDTH: u32 = 5;

/// A 5-year age range and the number of cohort members in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBin {
    /// Lower bound, always a multiple of [`BIN_WIDTH`].
    pub start: u32,
    /// `"{start}-{start+4}"`.
    pub range_label: String,
    pub count: u32,
}

impl AgeBin {
    pub fn new(start: u32, count: u32) -> Self {
        Self {
            start,
            range_label: range_label(start),
            count,
        }
    }

    /// Bin start for an age: the largest multiple of [`BIN_WIDTH`] not above it.
    pub fn start_for(age: u32) -> u32 {
        (age / BIN_WIDTH) * BIN_WIDTH
    }
}

// Widened so the top bin of the u32 range does not overflow.
fn range_label(start: u32) -> String {
    let end = u64::from(start) + u64::from(BIN_WIDTH) - 1;
    format!("{start}-{end}")
}

/// An inclusive integer-percentage range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    pub lo: u32,
    pub hi: u32,
}

/// All ranges, highest first. They cover every whole percentage in [0, 100].
pub const BIN_RANGES: [BinRange; 10] = [
    BinRange { lo: 90, hi: 100 },
    BinRange { lo: 80, hi: 89 },
    BinRange { lo: 70, hi: 79 },
    BinRange { lo: 60, hi: 69 },
    BinRange { lo: 50, hi: 59 },
    BinRange { lo: 40, hi: 49 },
    BinRange { lo: 30, hi: 39 },
    BinRange { lo: 20, hi: 29 },
    BinRange { lo: 10, hi: 19 },
    BinRange { lo: 0, hi: 9 },
];

impl BinRange {
    /// Compares the real value against the integer bounds, so 19.8 is in
    /// neither 10-19 nor 20-29.
    pub fn contains(&self, pct: f64) -> bool {
        self.lo as f64 <= pct && pct <= self.hi as f64
    }

    /// "90-100", "00-09"
    pub fn label(&self) -> String {
        format!("{:02}-{:02}", self.lo, self.hi)
    }
}

/// Index into [`BIN_RANGES`] for a percentage. Out-of-range and NaN inputs
/// clamp to the nearest end; values between two ranges fall into 0-9.
pub fn classify(pct: f64) -> usize {
    let clamped = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
    BIN_RANGES
        .iter()
        .position(|r| r.contains(clamped))
        .unwrap_or(BIN_RANGES.len() - 1)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinCounts {
    pub total: u64,
    pub successes: u64,
}

impl BinCounts {
    /// Success rate in percent, `None` when the bin is empty.
    pub fn win_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(100.0 * self.successes as f64 / self.total as f64)
        }
    }
}

/// Attempts and successes per [`BinRange`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinAccumulator {
    counts: [BinCounts; BIN_RANGES.len()],
}

impl BinAccumulator {
    /// Count one attempt in the bin holding `pct`. Returns the range used.
    pub fn record(&mut self, pct: f64, success: bool) -> BinRange {
        let idx = classify(pct);
        let c = &mut self.counts[idx];
        c.total += 1;
        if success {
            c.successes += 1;
        }
        BIN_RANGES[idx]
    }

    #[cfg(test)]
    pub fn get(&self, range: BinRange) -> BinCounts {
        BIN_RANGES
            .iter()
            .position(|r| *r == range)
            .map(|i| self.counts[i])
            .unwrap_or_default()
    }

    /// Every range with its counts, highest range first.
    pub fn iter(&self) -> impl Iterator<Item = (BinRange, BinCounts)> + '_ {
        BIN_RANGES.iter().copied().zip(self.counts.iter().copied())
    }

    #[cfg(test)]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.total).sum()
    }
}

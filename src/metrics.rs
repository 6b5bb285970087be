/// Row counts of one join stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Rows offered to the join.
    pub total: usize,
    /// Input rows with at least one counterpart.
    pub matched: usize,
    /// Input rows with no counterpart.
    pub missing: usize,
    /// Rows emitted; exceeds `matched` when a key has several counterparts.
    pub emitted: usize,
}

impl JoinStats {
    /// Share of input rows that matched, in `0.0..=1.0`. Empty joins report `0.0`.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    /// Extra rows produced by keys with more than one counterpart.
    pub fn fan_out(&self) -> usize {
        self.emitted.saturating_sub(self.matched)
    }
}

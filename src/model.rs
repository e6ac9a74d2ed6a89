//! In-memory representation of a Chutzpah coverage report. The reader
//! produces a `CoverageReport`, which the Cobertura writer consumes once.

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// A single instrumentable line with its 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHit {
    pub line_number: u32,
    pub hit_count: u64,
}

/// Coverage data for a single source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRecord {
    pub path: String,
    /// Per-file coverage as reported by the test runner.
    pub coverage: f64,
    /// One entry per source line. `None` marks a non-executable line.
    pub line_hits: Vec<Option<u64>>,
}

impl CoverageRecord {
    pub fn new(path: String, coverage: f64, line_hits: Vec<Option<u64>>) -> Self {
        Self {
            path,
            coverage,
            line_hits,
        }
    }

    /// Iterate over executable lines. Absent entries still consume a
    /// line number.
    pub fn lines(&self) -> impl Iterator<Item = LineHit> + '_ {
        self.line_hits
            .iter()
            .zip(1u32..)
            .filter_map(|(hits, line_number)| {
                hits.map(|hit_count| LineHit {
                    line_number,
                    hit_count,
                })
            })
    }

    #[must_use]
    pub fn coverable_lines(&self) -> u64 {
        self.line_hits.iter().filter(|h| h.is_some()).count() as u64
    }

    #[must_use]
    pub fn covered_lines(&self) -> u64 {
        self.line_hits
            .iter()
            .filter(|h| matches!(h, Some(n) if *n > 0))
            .count() as u64
    }
}

/// The complete result of reading a Chutzpah report, in document order.
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    pub records: Vec<CoverageRecord>,
}

impl CoverageReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//! Mergeable per-partition accumulators for column statistics.

use tdigest::TDigest;

use super::cell::Cell;

/// Smallest and largest t-digest compression we will build.
const MIN_DIGEST_SIZE: usize = 20;
const MAX_DIGEST_SIZE: usize = 10_000;

/// Values buffered before being folded into the digest.
const PENDING_CAPACITY: usize = 1024;

/// Map a relative error target onto a t-digest compression size.
pub(crate) fn digest_size(relative_error: f64) -> usize {
    let size = (1.0 / relative_error).ceil();
    if size.is_finite() {
        (size as usize).clamp(MIN_DIGEST_SIZE, MAX_DIGEST_SIZE)
    } else {
        MAX_DIGEST_SIZE
    }
}

/// Running sum and count of observed values.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MeanAccumulator {
    sum: f64,
    count: u64,
}

impl MeanAccumulator {
    /// Fold a slice of cells, skipping missing values.
    pub(crate) fn from_cells(cells: &[Cell]) -> Self {
        cells
            .iter()
            .filter_map(Cell::as_f64)
            .fold(Self::default(), |mut acc, v| {
                acc.sum += v;
                acc.count += 1;
                acc
            })
    }

    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    pub(crate) fn finish(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Streaming quantile sketch backed by a t-digest.
#[derive(Debug, Clone)]
pub(crate) struct QuantileSketch {
    digest: TDigest,
    pending: Vec<f64>,
    size: usize,
}

impl QuantileSketch {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            digest: TDigest::new_with_size(size),
            pending: Vec::with_capacity(PENDING_CAPACITY),
            size,
        }
    }

    /// Build a sketch over a slice of cells, skipping missing values.
    pub(crate) fn from_cells(cells: &[Cell], size: usize) -> Self {
        let mut sketch = Self::new(size);
        for value in cells.iter().filter_map(Cell::as_f64) {
            sketch.push(value);
        }
        sketch.flush();
        sketch
    }

    fn push(&mut self, value: f64) {
        self.pending.push(value);
        if self.pending.len() >= PENDING_CAPACITY {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let batch = std::mem::replace(&mut self.pending, Vec::with_capacity(PENDING_CAPACITY));
            self.digest = self.digest.merge_unsorted(batch);
        }
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.digest.count() == 0.0
    }

    /// Combine two partition sketches.
    ///
    /// Empty sides are skipped so the merged digest keeps the configured size.
    pub(crate) fn merge(mut self, mut other: Self) -> Self {
        self.flush();
        other.flush();

        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }

        let size = self.size;
        let digest = TDigest::merge_digests(vec![self.digest, other.digest]);
        Self {
            digest,
            pending: Vec::new(),
            size,
        }
    }

    /// Estimate the quantile at `probability`; `None` if nothing was observed.
    pub(crate) fn quantile(&self, probability: f64) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.digest.estimate_quantile(probability))
        }
    }
}

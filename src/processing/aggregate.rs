// src/processing/aggregate.rs
use itertools::izip;

use crate::io::history::SensorHistory;

/// One value per measurement column of the sensor history.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryVector {
    entries: Vec<(String, f64)>,
}

impl SummaryVector {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Column-wise mean of the last `window` rows of `history`.
///
/// Empty cells are skipped. A column without any value in the window, and
/// every column of an empty history, yields NaN.
pub fn summarize(history: &SensorHistory, window: usize) -> SummaryVector {
    let rows = history.rows();
    let start = rows.len().saturating_sub(window);
    let recent = &rows[start..];

    let n_cols = history.measurement_names().len();
    let mut sums = vec![0.0f64; n_cols];
    let mut counts = vec![0usize; n_cols];

    for row in recent {
        for (sum, count, cell) in izip!(&mut sums, &mut counts, row) {
            if let Some(value) = cell {
                *sum += value;
                *count += 1;
            }
        }
    }

    log::debug!(
        "Summarized {} of {} sensor rows over {} columns",
        recent.len(),
        rows.len(),
        n_cols
    );

    let entries = izip!(history.measurement_names(), sums, counts)
        .map(|(name, sum, count)| {
            let mean = if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            };
            (name.clone(), mean)
        })
        .collect();

    SummaryVector::new(entries)
}

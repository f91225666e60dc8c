//! Helpers for asserting on counters recorded through `metrics`.
//!
//! [`Snapshotter::snapshot`] drains the recorder, so take one [`Counters`]
//! per test and assert every series against it.

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

/// Creates a debugging recorder and snapshotter for metrics testing.
#[must_use]
pub fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

/// Counter series captured from a single snapshot.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    series: Vec<(String, Vec<(String, String)>, u64)>,
}

impl Counters {
    /// Sum of counter `name`, optionally restricted to series carrying the
    /// label `key = value`.
    #[must_use]
    pub fn value(&self, name: &str, label: Option<(&str, &str)>) -> u64 {
        self.series
            .iter()
            .filter(|(series, _, _)| series == name)
            .filter(|(_, labels, _)| {
                label.is_none_or(|(k, v)| labels.iter().any(|(lk, lv)| lk == k && lv == v))
            })
            .map(|(_, _, count)| count)
            .sum()
    }
}

/// Drain `snapshotter` once and keep its counters.
#[must_use]
pub fn counters(snapshotter: &Snapshotter) -> Counters {
    let series = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(count) => {
                let key = key.key();
                let labels = key
                    .labels()
                    .map(|l| (l.key().to_owned(), l.value().to_owned()))
                    .collect();
                Some((key.name().to_owned(), labels, count))
            }
            _ => None,
        })
        .collect();
    Counters { series }
}

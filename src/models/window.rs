// Raw per-metric sample arrays returned by one stats request

use std::collections::BTreeMap;

/// Metric name -> ordered samples. Array lengths may differ between metrics and
/// between targets; nothing here assumes a uniform window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleWindow {
    samples: BTreeMap<String, Vec<f64>>,
}

impl SampleWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: impl Into<String>, samples: Vec<f64>) {
        self.samples.insert(metric.into(), samples);
    }

    pub fn get(&self, metric: &str) -> Option<&[f64]> {
        self.samples.get(metric).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<f64>)> for SampleWindow {
    fn from_iter<I: IntoIterator<Item = (K, Vec<f64>)>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

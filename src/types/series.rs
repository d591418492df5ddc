//! Price series

use serde::{Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

/// Ordered price samples for one symbol over one timeframe
///
/// Index position encodes relative time order, not wall-clock time. The
/// sample buffer is shared, so cloning a cached series hands out the same
/// samples without copying them.
///
/// The client never produces an empty series (it reports
/// [`MarketDataError::NoData`](crate::MarketDataError::NoData) instead), but
/// the type itself allows it so the renderer can guard against it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    samples: Arc<[f64]>,
}

impl PriceSeries {
    /// Create a series from samples in time order
    pub fn new(samples: impl Into<Arc<[f64]>>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// The samples in time order
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Whether two series share the same sample buffer
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }

    /// Smallest and largest finite sample, if any
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.last().copied()
    }
}

impl Default for PriceSeries {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for PriceSeries {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}

impl FromIterator<f64> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Serialize for PriceSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.samples.as_ref().serialize(serializer)
    }
}

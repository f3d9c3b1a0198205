// Series aggregator - Fixed-capacity ring of chart buckets
use crate::domain::error::ConfigError;
use crate::domain::series::SeriesPoint;
use std::collections::VecDeque;

pub const HOURLY_DAY_CAPACITY: usize = 24;

/// Buckets in insertion order, oldest first. A point carrying the newest
/// bucket's label overwrites it; any other point is a new bucket, evicting
/// the oldest when full. Labels repeat across days, so an older bucket with
/// the same label is never reused.
#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    capacity: usize,
    buckets: VecDeque<SeriesPoint>,
}

impl SeriesAggregator {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            buckets: VecDeque::with_capacity(capacity),
        })
    }

    pub fn append(&mut self, point: SeriesPoint) {
        if let Some(newest) = self.buckets.back_mut() {
            if newest.label == point.label {
                *newest = point;
                return;
            }
        }

        if self.buckets.len() == self.capacity {
            if let Some(evicted) = self.buckets.pop_front() {
                tracing::debug!("Evicting series bucket {}", evicted.label);
            }
        }
        self.buckets.push_back(point);
    }

    /// Owned copy of the buffer; callers cannot reach the aggregator's state.
    pub fn snapshot(&self) -> Vec<SeriesPoint> {
        self.buckets.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

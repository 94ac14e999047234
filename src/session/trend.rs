// Bounded time series of recent toxicity scores for the trend chart.

use std::collections::VecDeque;

use chrono::Local;
use serde::Serialize;

/// Number of points the trend keeps.
pub const TREND_CAPACITY: usize = 30;

/// One sample on the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Wall-clock label, e.g. "3:04:05 PM".
    pub time: String,
    /// Toxicity percentage, 0 to 100.
    pub value: u8,
}

impl TrendPoint {
    pub fn new(time: impl Into<String>, value: u8) -> Self {
        Self {
            time: time.into(),
            value: value.min(100),
        }
    }

    /// A point stamped with the current local time.
    pub fn now(value: u8) -> Self {
        Self::new(Local::now().format("%-I:%M:%S %p").to_string(), value)
    }
}

/// Fixed-capacity FIFO of trend points, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ToxicityTrendBuffer {
    points: VecDeque<TrendPoint>,
}

impl ToxicityTrendBuffer {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TREND_CAPACITY),
        }
    }

    /// Add a point, evicting the oldest one when full.
    pub fn append(&mut self, point: TrendPoint) {
        if self.points.len() == TREND_CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn points(&self) -> impl Iterator<Item = &TrendPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<TrendPoint> {
        self.points.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&TrendPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

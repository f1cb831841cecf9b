use cosmwasm_std::{ConversionOverflowError, Int256, Int512};
use thiserror::Error;

use crate::types::DataFeed;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Nothing to aggregate")]
    Empty,

    #[error("{0}")]
    Overflow(#[from] ConversionOverflowError),
}

/// Values that can be aggregated by [`median`].
pub trait Midpoint: Ord + Copy {
    /// Mean of two values, rounded toward zero.
    fn midpoint(self, other: Self) -> Result<Self, AggregationError>;
}

impl Midpoint for Int256 {
    fn midpoint(self, other: Self) -> Result<Self, AggregationError> {
        Ok(average(self, other)?)
    }
}

impl Midpoint for u32 {
    fn midpoint(self, other: Self) -> Result<Self, AggregationError> {
        // the mean of two u32 always fits in a u32
        Ok(((u64::from(self) + u64::from(other)) / 2) as u32)
    }
}

/// Median of `values`. Even-length inputs average the two middle elements.
pub fn median<T: Midpoint>(values: &[T]) -> Result<T, AggregationError> {
    if values.is_empty() {
        return Err(AggregationError::Empty);
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Ok(sorted[mid])
    } else {
        sorted[mid - 1].midpoint(sorted[mid])
    }
}

/// Mean of two signed values.
///
/// The sum is taken in 512 bits. The halving truncates toward zero: an odd
/// negative sum rounds up, not down.
pub fn average(x: Int256, y: Int256) -> Result<Int256, ConversionOverflowError> {
    let sum = Int512::from(x) + Int512::from(y);
    Int256::try_from(sum / Int512::from(2i128))
}

/// Aggregates member feeds into `(median(values), median(timestamps))`.
pub fn aggregate(feeds: &[DataFeed]) -> Result<DataFeed, AggregationError> {
    let values: Vec<Int256> = feeds.iter().map(|f| f.value).collect();
    let timestamps: Vec<u32> = feeds.iter().map(|f| f.timestamp).collect();
    Ok(DataFeed {
        value: median(&values)?,
        timestamp: median(&timestamps)?,
    })
}

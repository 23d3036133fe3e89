//! Ordered frequency index over floats
//!
//! This contains a struct that counts occurrences of float observations while keeping the
//! distinct values in ascending order, so that summary statistics can be answered at any point
//! while data is still being added.
mod utils;

pub use utils::IndexError;
use utils::{normalize, weighted_average, FloatKey};

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Ordered frequency index
///
/// Stores how many times each distinct value was inserted, the distinct values in ascending
/// order, and the total number of insertions. Space is linear in the number of distinct values,
/// not in the number of insertions.
///
/// The index has no internal synchronization. Hosts that share one between threads must
/// serialize access themselves.
///
/// # Examples
///
/// ```
/// let nums = [2.0, 4.0, 2.0];
/// let mut index = float_index::FloatIndex::new();
/// for num in nums.iter() {
///     index.insert(*num).unwrap();
/// }
/// assert_eq!(3, index.count_total());
/// assert_eq!(2, index.count_unique());
/// ```
///
/// ```
/// let index = float_index::FloatIndex::from_values(vec![1.0, 1.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(6, index.count_total());
/// assert_eq!(3, index.get(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct FloatIndex {
    counts: HashMap<FloatKey, u64>,
    order: Vec<f64>,
    total: u64,
}

impl FloatIndex {
    /// Create a new index with no data
    pub fn new() -> Self {
        FloatIndex {
            counts: HashMap::new(),
            order: Vec::new(),
            total: 0,
        }
    }

    /// Create an index holding every value of `values`, inserted in order
    ///
    /// Fails on the first value that can't be inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![3.0, 1.0, 2.0]).unwrap();
    /// assert_eq!(&[1.0, 2.0, 3.0], index.order());
    /// ```
    ///
    /// ```
    /// let res = float_index::FloatIndex::from_values(vec![3.0, f64::NAN]);
    /// assert!(res.is_err());
    /// ```
    pub fn from_values<I>(values: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut index = FloatIndex::new();
        for val in values {
            index.insert(val)?;
        }
        Ok(index)
    }

    /// Add an observation
    ///
    /// NaN and infinities are rejected with `InvalidValue` and leave the index untouched.
    /// Negative zero is counted as zero. Inserting a value seen before is constant time,
    /// a new distinct value takes time linear in the number of distinct values.
    pub fn insert(&mut self, val: f64) -> Result<(), IndexError> {
        if !val.is_finite() {
            return Err(IndexError::InvalidValue(val));
        }
        let val = normalize(val);
        let count = self.counts.entry(FloatKey::new(val)).or_insert(0);
        if *count == 0 {
            if let Err(pos) = self.order.binary_search_by(|probe| probe.total_cmp(&val)) {
                self.order.insert(pos, val);
            }
        }
        *count += 1;
        self.total += 1;
        Ok(())
    }

    /// Get the number of times `val` was inserted
    ///
    /// # Examples
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![5.0, 5.0]).unwrap();
    /// assert_eq!(2, index.get(5.0));
    /// assert_eq!(0, index.get(6.0));
    /// ```
    pub fn get(&self, val: f64) -> u64 {
        self.counts.get(&FloatKey::new(val)).copied().unwrap_or(0)
    }

    /// Get the number of values inserted, duplicates included
    pub fn count_total(&self) -> u64 {
        self.total
    }

    /// Get the number of distinct values inserted
    pub fn count_unique(&self) -> usize {
        self.order.len()
    }

    /// The distinct values in ascending order
    pub fn order(&self) -> &[f64] {
        &self.order
    }

    /// Iterate over `(value, count)` pairs in ascending value order
    ///
    /// # Examples
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![2.0, 1.0, 2.0]).unwrap();
    /// let pairs: Vec<_> = index.iter().collect();
    /// assert_eq!(vec![(1.0, 1), (2.0, 2)], pairs);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.order.iter().map(move |&val| (val, self.get(val)))
    }

    /// Get the smallest value
    ///
    /// Constant time.
    ///
    /// # Examples
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![9.0, 5.0, 6.0, 4.0]).unwrap();
    /// assert_eq!(Ok(4.0), index.min());
    /// ```
    ///
    /// ```
    /// let index = float_index::FloatIndex::new();
    /// assert_eq!(Err(float_index::IndexError::Empty), index.min());
    /// ```
    pub fn min(&self) -> Result<f64, IndexError> {
        self.order.first().copied().ok_or(IndexError::Empty)
    }

    /// Get the largest value
    ///
    /// Constant time.
    pub fn max(&self) -> Result<f64, IndexError> {
        self.order.last().copied().ok_or(IndexError::Empty)
    }

    /// Get the sum of every inserted value
    ///
    /// Linear in the number of distinct values. Zero when nothing was inserted.
    pub fn sum(&self) -> f64 {
        self.iter().map(|(val, count)| val * count as f64).sum()
    }

    /// Get the mean
    ///
    /// If the plain sum overflows, the mean is accumulated as a running weighted average so it
    /// stays finite.
    ///
    /// # Examples
    ///
    /// ```
    /// let nums = vec![4.0, 5.0, 3.0, 4.0, 5.0, 6.0];
    /// let index = float_index::FloatIndex::from_values(nums).unwrap();
    /// assert!((4.5 - index.mean().unwrap()).abs() < 1.0e-6);
    /// ```
    pub fn mean(&self) -> Result<f64, IndexError> {
        match self.total {
            0 => Err(IndexError::Empty),
            total => {
                let sum = self.sum();
                if sum.is_finite() {
                    Ok(sum / total as f64)
                } else {
                    self.running_mean().ok_or(IndexError::Empty)
                }
            }
        }
    }

    fn running_mean(&self) -> Option<f64> {
        let mut mean = 0.0;
        let mut seen = 0;
        for (val, count) in self.iter() {
            seen += count;
            mean = weighted_average(mean, val, count as f64 / seen as f64)?;
        }
        Some(mean)
    }

    /// Get the value at a 1-based rank, counting duplicates
    ///
    /// Returns None for rank zero or a rank past the number of inserted values.
    ///
    /// # Examples
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![7.0, 3.0, 3.0]).unwrap();
    /// assert_eq!(Some(3.0), index.value_at_rank(2));
    /// assert_eq!(Some(7.0), index.value_at_rank(3));
    /// assert_eq!(None, index.value_at_rank(4));
    /// ```
    pub fn value_at_rank(&self, rank: u64) -> Option<f64> {
        if rank == 0 {
            return None;
        }
        let mut seen = 0;
        for (val, count) in self.iter() {
            seen += count;
            if seen >= rank {
                return Some(val);
            }
        }
        None
    }

    /// Get the approximate median
    ///
    /// This is the value at rank `total / 2 + 1`. For an even number of values it is the upper
    /// of the two middle values rather than their average; use `exact_median` for that. Linear
    /// in the number of distinct values.
    ///
    /// # Examples
    ///
    /// ```
    /// let nums = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let index = float_index::FloatIndex::from_values(nums).unwrap();
    /// assert_eq!(Ok(4.0), index.median());
    /// ```
    pub fn median(&self) -> Result<f64, IndexError> {
        self.value_at_rank(self.total / 2 + 1).ok_or(IndexError::Empty)
    }

    /// Get the median
    ///
    /// For an even number of values this averages the two middle values, which may be the same
    /// value when it is repeated across the middle.
    ///
    /// # Examples
    ///
    /// ```
    /// let nums = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let index = float_index::FloatIndex::from_values(nums).unwrap();
    /// assert!((3.5 - index.exact_median().unwrap()).abs() < 1.0e-6);
    /// ```
    ///
    /// ```
    /// let index = float_index::FloatIndex::new();
    /// assert!(index.exact_median().is_err());
    /// ```
    pub fn exact_median(&self) -> Result<f64, IndexError> {
        let mid = self.total / 2;
        if self.total % 2 == 1 {
            return self.value_at_rank(mid + 1).ok_or(IndexError::Empty);
        }
        let low = self.value_at_rank(mid).ok_or(IndexError::Empty)?;
        let high = self.value_at_rank(mid + 1).ok_or(IndexError::Empty)?;
        if low == high {
            return Ok(low);
        }
        weighted_average(low, high, 0.5).ok_or(IndexError::Empty)
    }

    /// Get the most frequent value
    ///
    /// If several values share the highest count, the smallest of them is returned. Linear in
    /// the number of distinct values.
    ///
    /// # Examples
    ///
    /// ```
    /// let nums = vec![5.0, 3.0, 2.0, 1.0, 5.0, 6.0, 6.0, 5.0, 5.0, 5.0];
    /// let index = float_index::FloatIndex::from_values(nums).unwrap();
    /// assert_eq!(Ok(5.0), index.mode());
    /// ```
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![8.0, 2.0, 8.0, 2.0]).unwrap();
    /// assert_eq!(Ok(2.0), index.mode());
    /// ```
    pub fn mode(&self) -> Result<f64, IndexError> {
        let mut best: Option<(f64, u64)> = None;
        for (val, count) in self.iter() {
            match best {
                Some((_, best_count)) if best_count >= count => (),
                _ => best = Some((val, count)),
            }
        }
        best.map(|(val, _)| val).ok_or(IndexError::Empty)
    }

    /// Return the number of times the mode occurred
    ///
    /// Zero for an empty index.
    pub fn mode_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Return an iterator of all of the modes in ascending order
    ///
    /// # Examples
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![3.0, 1.0, 3.0, 1.0, 2.0]).unwrap();
    /// let modes: Vec<_> = index.modes().collect();
    /// assert_eq!(vec![1.0, 3.0], modes);
    /// ```
    pub fn modes(&self) -> impl Iterator<Item = f64> + '_ {
        let top = self.mode_count();
        self.iter()
            .filter(move |&(_, count)| count == top)
            .map(|(val, _)| val)
    }

    /// Render the `value:count` listing in ascending value order
    ///
    /// # Examples
    ///
    /// ```
    /// let index = float_index::FloatIndex::from_values(vec![2.0, 1.0, 1.0]).unwrap();
    /// assert_eq!("1:2 2:1", index.counts_listing());
    /// ```
    pub fn counts_listing(&self) -> String {
        self.iter()
            .map(|(val, count)| format!("{}:{}", val, count))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for FloatIndex {
    fn default() -> Self {
        FloatIndex::new()
    }
}

/// Renders the distinct values in order, e.g. `[1, 2.5, 3]`
impl Display for FloatIndex {
    fn fmt(&self, formatter: &mut Formatter) -> Result<(), fmt::Error> {
        write!(formatter, "[")?;
        for (i, val) in self.order.iter().enumerate() {
            if i > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{}", val)?;
        }
        write!(formatter, "]")
    }
}

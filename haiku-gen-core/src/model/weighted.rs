use std::fmt::Display;

use rand::Rng;

use crate::error::{PoemError, Result};

/// Picks one candidate with probability proportional to its weight.
///
/// The input is only borrowed; nothing is mutated. Fails with
/// `EmptyDomain` when there are no candidates and with `InvalidWeight` when a
/// candidate has a weight of zero.
pub fn weighted_choice<'a, K, I, R>(weights: I, rng: &mut R) -> Result<&'a K>
where
	K: Display + ?Sized + 'a,
	I: IntoIterator<Item = (&'a K, &'a u32)>,
	R: Rng + ?Sized,
{
	let pool = WeightedPool::new(weights.into_iter().map(|(candidate, weight)| (candidate, *weight)))?;
	let index = pool.draw(rng)?;
	Ok(pool.candidate(index))
}

/// A shrinking set of weighted candidates.
///
/// Drawing is a binary search over cumulative weights, so a draw costs
/// O(log n) in the number of distinct candidates and memory is O(n) no
/// matter how large the weights are. Removing or decaying a candidate
/// rebuilds the cumulative table.
///
/// ## Invariants
/// - Every weight stored in `entries` is strictly positive
/// - `cumulative[i]` is the sum of weights `0..=i`
/// - Candidate order is the insertion order, so a seeded generator
///   reproduces the same sequence of draws
#[derive(Debug, Clone)]
pub struct WeightedPool<'a, K: ?Sized> {
	entries: Vec<(&'a K, u32)>,
	cumulative: Vec<u64>,
}

impl<'a, K: Display + ?Sized> WeightedPool<'a, K> {
	/// Builds a pool from `(candidate, weight)` pairs.
	///
	/// # Errors
	/// Returns `InvalidWeight` if a weight is zero. An empty input is
	/// accepted; drawing from it fails with `EmptyDomain`.
	pub fn new<I>(weights: I) -> Result<Self>
	where
		I: IntoIterator<Item = (&'a K, u32)>,
	{
		let mut entries = Vec::new();
		for (candidate, weight) in weights {
			if weight == 0 {
				return Err(PoemError::InvalidWeight { candidate: candidate.to_string() });
			}
			entries.push((candidate, weight));
		}

		let mut pool = Self { entries, cumulative: Vec::new() };
		pool.rebuild();
		Ok(pool)
	}

	fn rebuild(&mut self) {
		self.cumulative.clear();
		let mut running = 0u64;
		for (_, weight) in &self.entries {
			running += u64::from(*weight);
			self.cumulative.push(running);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Sum of all remaining weights.
	pub fn total_weight(&self) -> u64 {
		self.cumulative.last().copied().unwrap_or(0)
	}

	/// Returns the candidate stored at `index`.
	///
	/// # Panics
	/// Panics if `index` is out of bounds; indices come from `draw`.
	pub fn candidate(&self, index: usize) -> &'a K {
		self.entries[index].0
	}

	/// Draws the index of a candidate, weighted by the remaining weights.
	pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
		let total = self.total_weight();
		if total == 0 {
			return Err(PoemError::EmptyDomain);
		}

		let r = rng.random_range(0..total);
		// First bucket whose running total is strictly greater than `r`
		Ok(self.cumulative.partition_point(|&running| running <= r))
	}

	/// Drops the candidate at `index` from the pool.
	pub fn remove(&mut self, index: usize) {
		self.entries.remove(index);
		self.rebuild();
	}

	/// Removes a single occurrence of the candidate at `index`.
	///
	/// The candidate leaves the pool once its weight reaches zero.
	pub fn decay(&mut self, index: usize) {
		let weight = &mut self.entries[index].1;
		*weight -= 1;
		if *weight == 0 {
			self.entries.remove(index);
		}
		self.rebuild();
	}
}

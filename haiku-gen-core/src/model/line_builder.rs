use std::fmt;

use log::{debug, trace};
use rand::Rng;

use super::successor_table::SuccessorTable;
use super::syllable_table::SyllableTable;
use super::weighted::WeightedPool;
use crate::config::{GenerationConfig, RejectionPolicy};
use crate::error::{PoemError, Result};

/// A sequence of words with its total syllable count.
///
/// Displayed space-joined with the first character uppercased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
	words: Vec<String>,
	syllables: u32,
}

impl Line {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a word worth `syllables` syllables.
	pub fn push(&mut self, word: &str, syllables: u32) {
		self.words.push(word.to_owned());
		self.syllables += syllables;
	}

	/// Appends every word of `other`.
	pub fn extend(&mut self, other: Line) {
		self.words.extend(other.words);
		self.syllables += other.syllables;
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	pub fn syllables(&self) -> u32 {
		self.syllables
	}

	pub fn last_word(&self) -> Option<&str> {
		self.words.last().map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}

impl fmt::Display for Line {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&capitalize(&self.words.join(" ")))
	}
}

/// Uppercases the first character of `text`.
pub(crate) fn capitalize(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Outcome of checking one candidate against the remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
	Accepted(u32),
	/// Missing from the syllable table.
	Unknown,
	/// Known but worth zero syllables, so it can never advance the line.
	Silent,
	OverBudget(u32),
}

/// Builds lines that hit an exact syllable count by walking the chain.
///
/// Holds only borrowed, read-only tables, so one builder can serve any
/// number of lines and callers on different threads need no locking.
#[derive(Clone, Copy, Debug)]
pub struct LineBuilder<'a> {
	successors: &'a SuccessorTable,
	syllables: &'a SyllableTable,
	rejection: RejectionPolicy,
	max_attempts: usize,
}

impl<'a> LineBuilder<'a> {
	pub fn new(successors: &'a SuccessorTable, syllables: &'a SyllableTable, config: &GenerationConfig) -> Self {
		Self {
			successors,
			syllables,
			rejection: config.rejection,
			max_attempts: config.max_line_attempts(),
		}
	}

	pub fn successors(&self) -> &'a SuccessorTable {
		self.successors
	}

	pub fn syllables(&self) -> &'a SyllableTable {
		self.syllables
	}

	fn fit(&self, word: &str, remaining: u32) -> Fit {
		match self.syllables.get(word) {
			None => Fit::Unknown,
			Some(0) => Fit::Silent,
			Some(count) if count > remaining => Fit::OverBudget(count),
			Some(count) => Fit::Accepted(count),
		}
	}

	/// Makes a single attempt at a line of exactly `target` syllables.
	///
	/// The line continues the chain after `start_word` but does not include
	/// it. At each step the successors of the current word are drawn by
	/// weight; a draw that is unknown or over budget is taken out of the pool
	/// and the draw is repeated.
	///
	/// # Errors
	/// `NoFittingExtension` when the current word has no successors or every
	/// successor was rejected. The attempt is abandoned as a whole; callers
	/// restart from `start_word` (see `write_line`).
	pub fn build_line<R: Rng + ?Sized>(&self, start_word: &str, target: u32, rng: &mut R) -> Result<Line> {
		let mut line = Line::new();
		let mut current: &str = start_word;

		while line.syllables() < target {
			let remaining = target - line.syllables();
			let dead_end = || PoemError::NoFittingExtension { word: current.to_owned(), remaining };

			let weights = self.successors.successors(current).ok_or_else(dead_end)?;
			let mut pool = WeightedPool::new(weights.iter().map(|(word, count)| (word, *count)))?;

			let (word, count) = loop {
				if pool.is_empty() {
					return Err(dead_end());
				}
				let index = pool.draw(rng)?;
				let candidate = pool.candidate(index);

				match self.fit(candidate, remaining) {
					Fit::Accepted(count) => break (candidate, count),
					rejected => {
						trace!("rejected '{candidate}' after '{current}': {rejected:?}");
						match self.rejection {
							RejectionPolicy::Eliminate => pool.remove(index),
							RejectionPolicy::DecayOccurrence => pool.decay(index),
						}
					}
				}
			};

			line.push(word, count);
			current = word;
		}

		Ok(line)
	}

	/// Builds a line of exactly `target` syllables, restarting on dead ends.
	///
	/// Every attempt starts over from `start_word` with fresh random draws.
	/// A target of 0 yields an empty line.
	///
	/// # Errors
	/// `GenerationExhausted` once the configured number of attempts failed.
	/// Errors other than `NoFittingExtension` are returned immediately.
	pub fn write_line<R: Rng + ?Sized>(&self, start_word: &str, target: u32, rng: &mut R) -> Result<Line> {
		if target == 0 {
			return Ok(Line::new());
		}

		for attempt in 1..=self.max_attempts {
			match self.build_line(start_word, target, rng) {
				Ok(line) => {
					if attempt > 1 {
						debug!("'{start_word}' +{target} syllables succeeded on attempt {attempt}");
					}
					return Ok(line);
				}
				Err(PoemError::NoFittingExtension { word, remaining }) => {
					trace!("attempt {attempt} from '{start_word}' stuck at '{word}' with {remaining} left");
				}
				Err(e) => return Err(e),
			}
		}

		debug!("giving up on '{start_word}' +{target} syllables after {} attempts", self.max_attempts);
		Err(PoemError::GenerationExhausted {
			word: start_word.to_owned(),
			target,
			attempts: self.max_attempts,
		})
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn scenario_tables() -> (SuccessorTable, SyllableTable) {
		let mut successors = SuccessorTable::new();
		successors.add_transitions("the", "cat", 2);
		successors.add_transitions("the", "dog", 1);
		successors.add_transitions("cat", "sat", 3);
		successors.add_transitions("dog", "ran", 1);
		let syllables = ["the", "cat", "dog", "sat", "ran"].into_iter().map(|w| (w, 1)).collect();
		(successors, syllables)
	}

	fn config_with_attempts(attempts: usize) -> GenerationConfig {
		let mut config = GenerationConfig::default();
		config.set_max_line_attempts(attempts).unwrap();
		config
	}

	#[test]
	fn two_syllables_from_the() {
		let (successors, syllables) = scenario_tables();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);
		let mut rng = StdRng::seed_from_u64(11);

		for _ in 0..200 {
			let line = builder.build_line("the", 2, &mut rng).unwrap();
			let rendered = line.to_string();
			assert!(rendered == "Cat sat" || rendered == "Dog ran", "unexpected line {rendered:?}");
			assert_eq!(line.syllables(), 2);
			assert_eq!(line.words().len(), 2);
		}
	}

	#[test]
	fn both_branches_are_reachable() {
		let (successors, syllables) = scenario_tables();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);
		let mut rng = StdRng::seed_from_u64(2);

		let lines: Vec<String> = (0..200).map(|_| builder.build_line("the", 2, &mut rng).unwrap().to_string()).collect();
		assert!(lines.iter().any(|l| l == "Cat sat"));
		assert!(lines.iter().any(|l| l == "Dog ran"));
	}

	#[test]
	fn rejects_over_budget_and_unknown_successors() {
		let mut successors = SuccessorTable::new();
		successors.add_transitions("old", "pond", 1);
		successors.add_transitions("old", "frog", 1);
		successors.add_transitions("old", "evening", 50);
		successors.add_transitions("old", "xyzzy", 50);
		let syllables: SyllableTable = [("old", 1), ("pond", 1), ("frog", 1), ("evening", 3)].into_iter().collect();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);
		let mut rng = StdRng::seed_from_u64(5);

		for _ in 0..100 {
			// Exactly one accepted word per attempt; no restart needed
			let line = builder.build_line("old", 1, &mut rng).unwrap();
			let word = &line.words()[0];
			assert!(word == "pond" || word == "frog");
		}
	}

	#[test]
	fn exact_fit_terminates_without_restart() {
		let mut successors = SuccessorTable::new();
		successors.add_transitions("sun", "rises", 1);
		successors.add_transitions("sun", "unfortunately", 7);
		let syllables: SyllableTable = [("sun", 1), ("rises", 2), ("unfortunately", 5)].into_iter().collect();
		let config = config_with_attempts(1);
		let builder = LineBuilder::new(&successors, &syllables, &config);
		let mut rng = StdRng::seed_from_u64(8);

		for _ in 0..50 {
			assert_eq!(builder.write_line("sun", 2, &mut rng).unwrap().to_string(), "Rises");
		}
	}

	#[test]
	fn exhausted_pool_is_a_dead_end() {
		let mut successors = SuccessorTable::new();
		successors.add_transitions("river", "everlasting", 4);
		let syllables: SyllableTable = [("river", 2), ("everlasting", 4)].into_iter().collect();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);

		let result = builder.build_line("river", 3, &mut StdRng::seed_from_u64(1));
		match result {
			Err(PoemError::NoFittingExtension { word, remaining }) => {
				assert_eq!(word, "river");
				assert_eq!(remaining, 3);
			}
			other => panic!("expected NoFittingExtension, got {other:?}"),
		}
	}

	#[test]
	fn missing_successors_is_a_dead_end() {
		let (successors, syllables) = scenario_tables();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);

		// "sat" ends the corpus and has no successors
		let result = builder.build_line("the", 3, &mut StdRng::seed_from_u64(3));
		assert!(matches!(result, Err(PoemError::NoFittingExtension { .. })));
	}

	#[test]
	fn zero_syllable_words_are_skipped() {
		let mut successors = SuccessorTable::new();
		successors.add_transitions("a", "hmm", 100);
		successors.add_transitions("a", "moon", 1);
		let syllables: SyllableTable = [("a", 1), ("hmm", 0), ("moon", 1)].into_iter().collect();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);

		let line = builder.build_line("a", 1, &mut StdRng::seed_from_u64(4)).unwrap();
		assert_eq!(line.words(), &["moon".to_owned()]);
	}

	#[test]
	fn retry_ceiling_surfaces_exhaustion() {
		let mut successors = SuccessorTable::new();
		successors.add_transitions("start", "enormous", 1);
		let syllables: SyllableTable = [("start", 1), ("enormous", 3)].into_iter().collect();
		let config = config_with_attempts(25);
		let builder = LineBuilder::new(&successors, &syllables, &config);

		match builder.write_line("start", 2, &mut StdRng::seed_from_u64(6)) {
			Err(PoemError::GenerationExhausted { word, target, attempts }) => {
				assert_eq!(word, "start");
				assert_eq!(target, 2);
				assert_eq!(attempts, 25);
			}
			other => panic!("expected GenerationExhausted, got {other:?}"),
		}
	}

	#[test]
	fn write_line_recovers_from_dead_ends() {
		// "a" leads either to a dead end ("b", no successors) or to a fit
		let mut successors = SuccessorTable::new();
		successors.add_transitions("a", "b", 5);
		successors.add_transitions("a", "c", 1);
		successors.add_transitions("c", "d", 1);
		let syllables: SyllableTable = [("a", 1), ("b", 1), ("c", 1), ("d", 1)].into_iter().collect();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);
		let mut rng = StdRng::seed_from_u64(10);

		for _ in 0..20 {
			assert_eq!(builder.write_line("a", 2, &mut rng).unwrap().to_string(), "C d");
		}
	}

	#[test]
	fn decay_policy_still_finds_the_fit() {
		let mut successors = SuccessorTable::new();
		successors.add_transitions("dawn", "glistening", 4);
		successors.add_transitions("dawn", "dew", 1);
		let syllables: SyllableTable = [("dawn", 1), ("glistening", 3), ("dew", 1)].into_iter().collect();
		let mut config = config_with_attempts(1);
		config.rejection = RejectionPolicy::DecayOccurrence;
		let builder = LineBuilder::new(&successors, &syllables, &config);
		let mut rng = StdRng::seed_from_u64(12);

		for _ in 0..20 {
			assert_eq!(builder.write_line("dawn", 1, &mut rng).unwrap().to_string(), "Dew");
		}
	}

	#[test]
	fn zero_target_is_an_empty_line() {
		let (successors, syllables) = scenario_tables();
		let config = GenerationConfig::default();
		let builder = LineBuilder::new(&successors, &syllables, &config);
		let line = builder.write_line("the", 0, &mut StdRng::seed_from_u64(0)).unwrap();
		assert!(line.is_empty());
		assert_eq!(line.to_string(), "");
	}

	#[test]
	fn capitalize_handles_unicode_and_empty() {
		assert_eq!(capitalize("école du soir"), "École du soir");
		assert_eq!(capitalize(""), "");
	}
}

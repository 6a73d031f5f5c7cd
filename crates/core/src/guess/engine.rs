//! Guess engine: tries one candidate title against the oracle.

use tokio::time::Duration;
use tracing::debug;

use crate::oracle::{parse_reveals, GuessPacer, OracleError, PuzzleOracle};
use crate::tree::{word_length, Title};

use super::knowledge::PuzzleKnowledge;
use super::types::{AttemptOutcome, SkipReason};

/// Submits candidate words to the oracle and folds the replies into
/// [`PuzzleKnowledge`].
///
/// Candidates that cannot be the title under the observed length profile,
/// or whose next word would be a repeat, are dropped before any call is
/// made. Those drops are never errors.
pub struct GuessEngine<'o, O: PuzzleOracle + ?Sized> {
    oracle: &'o O,
    pacer: GuessPacer,
    oracle_calls: u64,
}

impl<'o, O: PuzzleOracle + ?Sized> GuessEngine<'o, O> {
    pub fn new(oracle: &'o O, guess_delay: Duration) -> Self {
        Self {
            oracle,
            pacer: GuessPacer::new(guess_delay),
            oracle_calls: 0,
        }
    }

    /// Number of guesses submitted so far.
    pub fn oracle_calls(&self) -> u64 {
        self.oracle_calls
    }

    /// Attempt one candidate title.
    ///
    /// Each still-unknown position is checked in title order; the first
    /// inconsistent or redundant word abandons the candidate. An oracle
    /// failure aborts the whole attempt.
    pub async fn attempt_title(
        &mut self,
        title: &Title,
        title_profile: &[usize],
        knowledge: &mut PuzzleKnowledge,
    ) -> Result<AttemptOutcome, OracleError> {
        if let Some(reason) = precheck(title, title_profile, knowledge) {
            debug!(title = %title, reason = %reason, "Skipping candidate");
            return Ok(AttemptOutcome::Skipped(reason));
        }

        debug!(title = %title, "Guessing title");

        for (position, word) in title.words().iter().enumerate() {
            // Earlier guesses of this candidate may have filled it already.
            if !knowledge.is_unknown(position) {
                continue;
            }
            if let Some(reason) = check_word(position, word, title_profile, knowledge) {
                debug!(title = %title, reason = %reason, "Abandoning candidate");
                return Ok(AttemptOutcome::Skipped(reason));
            }

            self.guess_word(word, knowledge).await?;
            if knowledge.is_found() {
                return Ok(AttemptOutcome::Found);
            }
        }

        Ok(AttemptOutcome::Unresolved)
    }

    async fn guess_word(
        &mut self,
        word: &str,
        knowledge: &mut PuzzleKnowledge,
    ) -> Result<(), OracleError> {
        self.pacer.wait_turn().await;
        knowledge.mark_tried(word);
        self.oracle_calls += 1;
        debug!(word = word, oracle = self.oracle.name(), "Guessing word");

        let feedback = parse_reveals(self.oracle.submit_guess(word).await?);
        for close in &feedback.close_words {
            knowledge.record_close(close);
        }
        let mut filled = 0;
        for (revealed, positions) in &feedback.reveals {
            filled += knowledge.apply_reveal(revealed, positions);
        }

        let pacing = self.pacer.status();
        debug!(
            word = word,
            filled = filled,
            close = feedback.close_words.len(),
            submissions = pacing.submissions,
            next_guess_in_ms = ?pacing.next_available_in_ms,
            "Guess scored"
        );
        Ok(())
    }
}

fn precheck(
    title: &Title,
    title_profile: &[usize],
    knowledge: &PuzzleKnowledge,
) -> Option<SkipReason> {
    if title.word_count() != title_profile.len() {
        return Some(SkipReason::WordCountMismatch {
            expected: title_profile.len(),
            actual: title.word_count(),
        });
    }
    if knowledge.is_found() {
        return Some(SkipReason::AlreadyResolved);
    }
    None
}

fn check_word(
    position: usize,
    word: &str,
    title_profile: &[usize],
    knowledge: &PuzzleKnowledge,
) -> Option<SkipReason> {
    if word_length(word) != title_profile[position] {
        return Some(SkipReason::LengthMismatch { position });
    }
    if knowledge.is_tried(word) {
        return Some(SkipReason::AlreadyTried {
            word: word.to_string(),
        });
    }
    if knowledge.is_revealed(word) {
        return Some(SkipReason::AlreadyRevealed {
            word: word.to_string(),
        });
    }
    None
}

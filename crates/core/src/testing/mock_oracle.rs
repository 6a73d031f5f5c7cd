//! Mock oracle for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::oracle::{GuessReply, OracleError, PuzzleOracle, PuzzleState, CLOSE_WORD_MARKER};
use crate::tree::Title;

/// A recorded guess for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedGuess {
    /// The submitted word.
    pub word: String,
    /// When the guess was made.
    pub timestamp: Instant,
}

/// Mock implementation of the PuzzleOracle trait.
///
/// Scores guesses against a hidden title the way the live site does: an
/// exact word reveals every position it occupies, a registered near miss is
/// reported under a `#`-prefixed key.
///
/// # Example
///
/// ```rust,ignore
/// use pedantix_core::testing::MockOracle;
///
/// let oracle = MockOracle::with_title("Le Petit Prince");
/// let reply = oracle.submit_guess("Petit").await?;
/// assert_eq!(reply["Petit"], vec![1]);
/// assert_eq!(oracle.guess_count().await, 1);
/// ```
pub struct MockOracle {
    /// Hidden title words.
    title: Vec<String>,
    /// Page state returned by `puzzle_state`.
    state: PuzzleState,
    /// Recorded guesses.
    guesses: Arc<RwLock<Vec<RecordedGuess>>>,
    /// Near-miss guesses -> title word they are close to.
    close: Arc<RwLock<HashMap<String, String>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<OracleError>>>,
}

impl std::fmt::Debug for MockOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOracle")
            .field("title", &self.title)
            .field("guesses", &"<guesses>")
            .field("next_error", &"<next_error>")
            .finish()
    }
}

impl MockOracle {
    /// Create a mock hiding `raw_title`, with an empty article.
    pub fn with_title(raw_title: &str) -> Self {
        Self::with_puzzle(raw_title, 1, Vec::new())
    }

    /// Create a mock hiding `raw_title` whose page reports `text_lengths`.
    pub fn with_puzzle(raw_title: &str, day: u32, text_lengths: Vec<usize>) -> Self {
        let title = Title::from_raw(raw_title);
        let state = PuzzleState {
            day,
            title_lengths: title.lengths(),
            text_lengths,
        };
        Self {
            title: title.words().to_vec(),
            state,
            guesses: Arc::new(RwLock::new(Vec::new())),
            close: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Report `guess` as a near miss of `title_word`.
    pub async fn add_close_word(&self, title_word: &str, guess: &str) {
        self.close
            .write()
            .await
            .insert(guess.to_string(), title_word.to_string());
    }

    /// Get recorded guesses.
    pub async fn recorded_guesses(&self) -> Vec<RecordedGuess> {
        self.guesses.read().await.clone()
    }

    /// Guessed words in submission order.
    pub async fn guessed_words(&self) -> Vec<String> {
        self.guesses
            .read()
            .await
            .iter()
            .map(|g| g.word.clone())
            .collect()
    }

    /// Get the number of guesses performed.
    pub async fn guess_count(&self) -> usize {
        self.guesses.read().await.len()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: OracleError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<OracleError> {
        self.next_error.write().await.take()
    }

    fn positions_of(&self, word: &str) -> Vec<usize> {
        self.title
            .iter()
            .enumerate()
            .filter(|(_, w)| *w == word)
            .map(|(i, _)| i)
            .collect()
    }
}

#[async_trait]
impl PuzzleOracle for MockOracle {
    fn name(&self) -> &str {
        "mock"
    }

    async fn puzzle_state(&self) -> Result<PuzzleState, OracleError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.state.clone())
    }

    async fn submit_guess(&self, word: &str) -> Result<GuessReply, OracleError> {
        // A failed round trip still reached the server.
        self.guesses.write().await.push(RecordedGuess {
            word: word.to_string(),
            timestamp: Instant::now(),
        });

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let mut reply = GuessReply::new();
        let exact = self.positions_of(word);
        if !exact.is_empty() {
            reply.insert(word.to_string(), exact);
        }
        if let Some(target) = self.close.read().await.get(word) {
            let positions = self.positions_of(target);
            if !positions.is_empty() {
                reply.insert(format!("{}{}", CLOSE_WORD_MARKER, word), positions);
            }
        }
        Ok(reply)
    }
}

pub mod config;
pub mod guess;
pub mod indexer;
pub mod oracle;
pub mod schedule;
pub mod search;
pub mod testing;
pub mod tree;

pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
    IndexConfig, OracleConfig, ScheduleConfig, SearchConfig,
};
pub use guess::{
    AttemptOutcome, AttemptState, GuessEngine, PuzzleKnowledge, Resolution, Resolver, SkipReason,
};
pub use indexer::{build_tree, read_corpus, BuildOptions, CorpusRecord, IndexError};
pub use oracle::{GuessPacer, GuessReply, HttpOracle, OracleError, PuzzleOracle, PuzzleState};
pub use search::{search, CandidateWalk, SearchOptions};
pub use tree::{read_snapshot, write_snapshot, LengthNode, LengthTree, Title, TreeError, TreeStats};

//! Candidate search over the length tree.

mod traversal;

pub use traversal::{ranked_children, search, CandidateWalk, SearchOptions};

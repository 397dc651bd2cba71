//! In-memory adapters for tests and dry runs.

mod git;

pub use git::InMemoryGitRepository;

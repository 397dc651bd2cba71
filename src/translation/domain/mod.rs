//! Domain model for translation tracking.

mod descriptor;
mod error;
mod marker;
mod tree;

pub use descriptor::{
    BranchConfig, GithubConfig, LanguageConfig, RepositoriesFile, RepositoryDescriptor,
    RepositoryRef, SourceConfig, StatusLabels, SyncStatus, UrlPrefix,
};
pub use error::RepositoryConfigError;
pub use marker::Marker;
pub use tree::{CommitId, FileTree, IgnoreList};
pub(crate) use tree::strip_directory;

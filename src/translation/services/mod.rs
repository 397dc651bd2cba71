//! Translation services: locating work, creating task issues, and
//! reconciling pull requests with task issues.

mod error;
mod locator;
mod sync;
mod task_issue;

pub use error::{LocateError, LocateResult, SyncError, SyncResult, TaskIssueError, TaskIssueResult};
pub use locator::{FileDiffLocator, new_files, updated_files};
pub use sync::{
    Disposition, PullRequestOutcome, PullRequestSynchronizer, SyncOptions, SyncReport,
};
pub use task_issue::{
    BuildSummary, IssueRequest, NEW_FILE_LABEL, TaskIssueOptions, TaskIssueService,
    TranslationWork, UPDATED_FILE_LABEL, duplicate_titles,
};

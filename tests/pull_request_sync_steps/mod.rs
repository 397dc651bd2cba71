//! Step definitions for pull request sync scenarios.

pub mod given;
pub mod when;

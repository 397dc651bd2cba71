//! Translation tracking between a code repository and a task repository.
//!
//! Source-language files are compared with their translations to find work
//! (new and stale files), task issues are created for that work, and pull
//! requests in the code repository are reconciled with their task issues by
//! moving a status label and leaving idempotency markers in comments.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

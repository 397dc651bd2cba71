//! Unit tests for the host context.

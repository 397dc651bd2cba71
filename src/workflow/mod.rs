//! Declarative issue workflow engine.
//!
//! A workflow maps inbound events to command rules. The first rule whose
//! trigger fully matches the command text is evaluated: its conditions run in
//! order, the first failing condition runs its own failure actions and stops
//! evaluation, and when every condition passes the rule's actions run in
//! order.
//!
//! - Subjects, ingress and configuration in [`domain`]
//! - Interpolation, conditions, actions and dispatch in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;

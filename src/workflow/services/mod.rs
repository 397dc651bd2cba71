//! Workflow services: interpolation, condition checks, actions and dispatch.

mod actions;
mod conditions;
mod engine;
mod error;
mod interpolator;

pub use actions::ActionExecutor;
pub use conditions::ConditionEvaluator;
pub use engine::{DispatchOutcome, WorkflowEngine};
pub use error::{DispatchError, DispatchResult, InterpolationError};
pub use interpolator::{Resolved, VariableInterpolator};

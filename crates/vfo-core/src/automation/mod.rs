//! Stage-change automation rules.

mod evaluator;
mod model;
mod repository;

pub use evaluator::{evaluate, matching_rules};
pub use model::{AutomationAction, AutomationEvent, AutomationRule, TransitionContext};
pub use repository::AutomationRuleRepository;

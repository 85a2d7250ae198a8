//! Nurture sequences: ordered, revisable outreach recipes.

mod model;
mod repository;

pub use model::{
    NurtureSequence, NurtureStep, PlannedStep, SMS_SOFT_LIMIT, StepPatch, StepType,
    default_sequences, parse_label_offset,
};
pub use repository::NurtureSequenceRepository;

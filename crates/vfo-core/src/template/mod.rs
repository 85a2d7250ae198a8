//! Email template domain module.
//!
//! - `model`: `EmailTemplate` and id synthesis
//! - `resolver`: `{{field}}` merge-tag substitution
//! - `shell`: branded header/footer wrapping
//! - `repository`: persistence trait

mod model;
mod repository;
pub mod resolver;
pub mod shell;

pub use model::{EmailTemplate, generate_template_id, slugify};
pub use repository::EmailTemplateRepository;
pub use resolver::{merge_tags, resolve};
pub use shell::{TemplateShell, shell_depth, unwrap_html};

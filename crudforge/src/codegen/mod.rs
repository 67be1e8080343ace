//! Code generation module

mod artifact;
mod code_generator;
mod context;
mod entity_generator;
mod form_generator;
mod list_generator;
mod model_generator;
mod naming;
mod service_generator;
mod style_generator;
mod type_resolver;

pub use artifact::*;
pub use code_generator::*;
pub use context::{Field, TemplateContext};
pub use entity_generator::AUTO_GENERATED_MARKER;
pub use form_generator::InputKind;
pub use naming::*;
pub use type_resolver::*;

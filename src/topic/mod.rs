mod function;
mod parser;
mod template;

pub use template::{Pipeline, TopicTemplate};

/// Topic used for every series when no template is configured.
pub const DEFAULT_TOPIC: &str = "metrics";

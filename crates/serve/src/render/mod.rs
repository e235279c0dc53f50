pub mod template;

pub use template::{TemplateEngine, TwigEngine};

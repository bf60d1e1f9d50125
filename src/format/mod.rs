//! Rendering file records through `%x` templates
//!
//! - `Template`: parsed once from `--format`
//! - `Renderer`: template plus name cache, produces one line per file

mod render;
mod template;
mod utils;

pub use render::Renderer;
pub use template::{DEFAULT_FORMAT, Field, Segment, Template};
pub use utils::{
    escape_name, format_size, format_timestamp, indicator, octal_permissions, permission_string,
};

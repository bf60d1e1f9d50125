//! Render a `File` through a `Template`

use std::os::unix::ffi::OsStrExt;

use crate::file::File;
use crate::names::NameCache;

use super::template::{Field, Segment, Template};
use super::utils::{
    escape_name, format_size, format_timestamp, indicator, octal_permissions, permission_string,
};

/// Turns file records into output lines. Owns the name cache so repeated
/// owners cost one lookup per run.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    template: Template,
    names: NameCache,
}

impl Renderer {
    pub fn new(template: Template) -> Self {
        Self::with_names(template, NameCache::new())
    }

    pub fn with_names(template: Template, names: NameCache) -> Self {
        Self { template, names }
    }

    pub fn names_mut(&mut self) -> &mut NameCache {
        &mut self.names
    }

    /// Render one line, without a trailing newline. Names are copied as raw
    /// bytes, so the line is not necessarily UTF-8.
    pub fn render(&mut self, file: &File) -> Vec<u8> {
        let mut line = Vec::new();
        for segment in self.template.segments() {
            match segment {
                Segment::Literal(text) => line.extend_from_slice(text.as_bytes()),
                Segment::Field(field) => render_field(&mut line, *field, file, &mut self.names),
            }
        }
        line
    }
}

fn render_field(line: &mut Vec<u8>, field: Field, file: &File, names: &mut NameCache) {
    let attrs = file.attributes();
    let text = match field {
        Field::PathEscaped => return line.extend(escape_name(file.path().as_os_str().as_bytes())),
        Field::Path => return line.extend_from_slice(file.path().as_os_str().as_bytes()),
        Field::BasenameEscaped => return line.extend(escape_name(file.basename().as_bytes())),
        Field::Basename => return line.extend_from_slice(file.basename().as_bytes()),
        Field::Extension => return line.extend_from_slice(file.extension().as_bytes()),
        Field::Stem => return line.extend_from_slice(file.stem().as_bytes()),
        Field::Indicator => return line.extend_from_slice(indicator(attrs.mode).as_bytes()),
        Field::User => names.user_or_id(attrs.uid),
        Field::Uid => attrs.uid.to_string(),
        Field::Group => names.group_or_id(attrs.gid),
        Field::Gid => attrs.gid.to_string(),
        Field::Size => attrs.size.to_string(),
        Field::HumanSize => format_size(attrs.size),
        Field::Permissions => permission_string(attrs.mode),
        Field::OctalMode => octal_permissions(attrs.mode),
        Field::Inode => attrs.inode.to_string(),
        Field::LinkCount => attrs.link_count.to_string(),
        Field::Atime => attrs.atime.to_string(),
        Field::AtimeHuman => format_timestamp(attrs.atime),
        Field::Mtime => attrs.mtime.to_string(),
        Field::MtimeHuman => format_timestamp(attrs.mtime),
        Field::Ctime => attrs.ctime.to_string(),
        Field::CtimeHuman => format_timestamp(attrs.ctime),
    };
    line.extend_from_slice(text.as_bytes());
}

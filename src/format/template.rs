//! Output template parsing
//!
//! A template is parsed once into literal and field segments so rendering a
//! line never has to rescan the format string.

use std::fmt;
use std::str::FromStr;

use crate::error::{FlsError, Result};

/// Default template: permissions, links, owner, group, size, mtime, path.
pub const DEFAULT_FORMAT: &str = "%p %l %u %g %h %M %N";

/// One `%x` substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PathEscaped,
    Path,
    BasenameEscaped,
    Basename,
    User,
    Uid,
    Group,
    Gid,
    Size,
    HumanSize,
    Permissions,
    OctalMode,
    Inode,
    LinkCount,
    Extension,
    Stem,
    Atime,
    AtimeHuman,
    Mtime,
    MtimeHuman,
    Ctime,
    CtimeHuman,
    Indicator,
}

impl Field {
    pub fn from_token(token: char) -> Option<Self> {
        let field = match token {
            'n' => Field::PathEscaped,
            'N' => Field::Path,
            'b' => Field::BasenameEscaped,
            'B' => Field::Basename,
            'u' => Field::User,
            'U' => Field::Uid,
            'g' => Field::Group,
            'G' => Field::Gid,
            's' => Field::Size,
            'h' => Field::HumanSize,
            'p' => Field::Permissions,
            'P' => Field::OctalMode,
            'i' => Field::Inode,
            'l' => Field::LinkCount,
            'e' => Field::Extension,
            'E' => Field::Stem,
            'a' => Field::Atime,
            'A' => Field::AtimeHuman,
            'm' => Field::Mtime,
            'M' => Field::MtimeHuman,
            'c' => Field::Ctime,
            'C' => Field::CtimeHuman,
            'F' => Field::Indicator,
            _ => return None,
        };
        Some(field)
    }

    pub fn token(self) -> char {
        match self {
            Field::PathEscaped => 'n',
            Field::Path => 'N',
            Field::BasenameEscaped => 'b',
            Field::Basename => 'B',
            Field::User => 'u',
            Field::Uid => 'U',
            Field::Group => 'g',
            Field::Gid => 'G',
            Field::Size => 's',
            Field::HumanSize => 'h',
            Field::Permissions => 'p',
            Field::OctalMode => 'P',
            Field::Inode => 'i',
            Field::LinkCount => 'l',
            Field::Extension => 'e',
            Field::Stem => 'E',
            Field::Atime => 'a',
            Field::AtimeHuman => 'A',
            Field::Mtime => 'm',
            Field::MtimeHuman => 'M',
            Field::Ctime => 'c',
            Field::CtimeHuman => 'C',
            Field::Indicator => 'F',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed output template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template. `%%` is a literal percent; any other unknown
    /// `%x` or a trailing lone `%` is rejected.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let token = chars.next().ok_or(FlsError::DanglingPercent)?;
            if token == '%' {
                literal.push('%');
                continue;
            }
            let field = Field::from_token(token).ok_or(FlsError::UnknownFormatToken { token })?;
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::parse(DEFAULT_FORMAT).unwrap_or(Self {
            segments: Vec::new(),
        })
    }
}

impl FromStr for Template {
    type Err = FlsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{}", text.replace('%', "%%"))?,
                Segment::Field(field) => write!(f, "%{}", field.token())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_template() {
        let template = Template::parse(DEFAULT_FORMAT).unwrap();
        let fields: Vec<Field> = template
            .segments()
            .iter()
            .filter_map(|s| match s {
                Segment::Field(f) => Some(*f),
                Segment::Literal(_) => None,
            })
            .collect();
        assert_eq!(
            fields,
            vec![
                Field::Permissions,
                Field::LinkCount,
                Field::User,
                Field::Group,
                Field::HumanSize,
                Field::MtimeHuman,
                Field::Path,
            ]
        );
    }

    #[test]
    fn test_parse_literals_and_percent() {
        let template = Template::parse("size=%s 100%%").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("size=".to_string()),
                Segment::Field(Field::Size),
                Segment::Literal(" 100%".to_string()),
            ]
        );
    }

    #[test]
    fn test_every_token_round_trips_through_display() {
        let all = "%n%N%b%B%u%U%g%G%s%h%p%P%i%l%e%E%a%A%m%M%c%C%F";
        let template = Template::parse(all).unwrap();
        assert_eq!(template.segments().len(), 23);
        assert_eq!(template.to_string(), all);
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let err = Template::parse("%z").unwrap_err();
        assert!(matches!(err, FlsError::UnknownFormatToken { token: 'z' }));

        let err = Template::parse("%_").unwrap_err();
        assert!(matches!(err, FlsError::UnknownFormatToken { token: '_' }));
    }

    #[test]
    fn test_dangling_percent_is_rejected() {
        let err = Template::parse("name %").unwrap_err();
        assert!(matches!(err, FlsError::DanglingPercent));
    }

    #[test]
    fn test_empty_template() {
        let template = Template::parse("").unwrap();
        assert!(template.segments().is_empty());
    }
}

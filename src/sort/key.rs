//! Sort keys and their comparison domains
//!
//! Every key belongs to exactly one domain by construction: `SortKey` wraps a
//! domain-specific key enum, and each of those extracts only its own value
//! type. A level of the sort tree is therefore typed by its key, and there is
//! no runtime check of "does this key produce this kind of value".

use std::fmt;
use std::os::unix::ffi::OsStrExt;

use crate::error::{FlsError, Result};
use crate::file::File;
use crate::names::NameCache;

/// A key whose values form one ordered comparison domain.
pub trait SortDomain: Copy + fmt::Debug {
    type Value: Ord + fmt::Debug + 'static;

    fn extract(self, file: &File, names: &mut NameCache) -> Self::Value;
}

/// Ordered bytewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Path,
    Basename,
    User,
    Group,
    Extension,
    Stem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsignedSmallKey {
    Uid,
    Gid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsignedLargeKey {
    Inode,
    LinkCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedKey {
    Size,
    Atime,
    Mtime,
    Ctime,
}

impl SortDomain for TextKey {
    type Value = Vec<u8>;

    fn extract(self, file: &File, names: &mut NameCache) -> Vec<u8> {
        let attrs = file.attributes();
        match self {
            TextKey::Path => file.path().as_os_str().as_bytes().to_vec(),
            TextKey::Basename => file.basename().as_bytes().to_vec(),
            TextKey::User => names.user_or_id(attrs.uid).into_bytes(),
            TextKey::Group => names.group_or_id(attrs.gid).into_bytes(),
            TextKey::Extension => file.extension().as_bytes().to_vec(),
            TextKey::Stem => file.stem().as_bytes().to_vec(),
        }
    }
}

impl SortDomain for UnsignedSmallKey {
    type Value = u32;

    fn extract(self, file: &File, _names: &mut NameCache) -> u32 {
        match self {
            UnsignedSmallKey::Uid => file.attributes().uid,
            UnsignedSmallKey::Gid => file.attributes().gid,
        }
    }
}

impl SortDomain for UnsignedLargeKey {
    type Value = u64;

    fn extract(self, file: &File, _names: &mut NameCache) -> u64 {
        match self {
            UnsignedLargeKey::Inode => file.attributes().inode,
            UnsignedLargeKey::LinkCount => file.attributes().link_count,
        }
    }
}

impl SortDomain for SignedKey {
    type Value = i64;

    fn extract(self, file: &File, _names: &mut NameCache) -> i64 {
        let attrs = file.attributes();
        match self {
            SignedKey::Size => attrs.size,
            SignedKey::Atime => attrs.atime,
            SignedKey::Mtime => attrs.mtime,
            SignedKey::Ctime => attrs.ctime,
        }
    }
}

/// Comparison domain of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Text,
    UnsignedSmall,
    UnsignedLarge,
    Signed,
}

/// One selectable sort attribute, tagged with its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Text(TextKey),
    UnsignedSmall(UnsignedSmallKey),
    UnsignedLarge(UnsignedLargeKey),
    Signed(SignedKey),
}

impl SortKey {
    pub const PATH: SortKey = SortKey::Text(TextKey::Path);
    pub const BASENAME: SortKey = SortKey::Text(TextKey::Basename);
    pub const USER: SortKey = SortKey::Text(TextKey::User);
    pub const GROUP: SortKey = SortKey::Text(TextKey::Group);
    pub const EXTENSION: SortKey = SortKey::Text(TextKey::Extension);
    pub const STEM: SortKey = SortKey::Text(TextKey::Stem);
    pub const UID: SortKey = SortKey::UnsignedSmall(UnsignedSmallKey::Uid);
    pub const GID: SortKey = SortKey::UnsignedSmall(UnsignedSmallKey::Gid);
    pub const INODE: SortKey = SortKey::UnsignedLarge(UnsignedLargeKey::Inode);
    pub const LINK_COUNT: SortKey = SortKey::UnsignedLarge(UnsignedLargeKey::LinkCount);
    pub const SIZE: SortKey = SortKey::Signed(SignedKey::Size);
    pub const ATIME: SortKey = SortKey::Signed(SignedKey::Atime);
    pub const MTIME: SortKey = SortKey::Signed(SignedKey::Mtime);
    pub const CTIME: SortKey = SortKey::Signed(SignedKey::Ctime);

    /// One-character token as accepted by `--sort`.
    pub fn from_token(token: char) -> Option<Self> {
        let key = match token {
            'n' => Self::PATH,
            'b' => Self::BASENAME,
            's' => Self::SIZE,
            'u' => Self::USER,
            'U' => Self::UID,
            'g' => Self::GROUP,
            'G' => Self::GID,
            'i' => Self::INODE,
            'l' => Self::LINK_COUNT,
            'e' => Self::EXTENSION,
            'E' => Self::STEM,
            'a' => Self::ATIME,
            'm' => Self::MTIME,
            'c' => Self::CTIME,
            _ => return None,
        };
        Some(key)
    }

    /// Long key name as accepted by `--sort`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "path" => Self::PATH,
            "name" | "basename" => Self::BASENAME,
            "size" => Self::SIZE,
            "user" => Self::USER,
            "uid" => Self::UID,
            "group" => Self::GROUP,
            "gid" => Self::GID,
            "inode" => Self::INODE,
            "links" => Self::LINK_COUNT,
            "ext" | "extension" => Self::EXTENSION,
            "stem" => Self::STEM,
            "atime" => Self::ATIME,
            "mtime" => Self::MTIME,
            "ctime" => Self::CTIME,
            _ => return None,
        };
        Some(key)
    }

    pub fn domain(self) -> Domain {
        match self {
            SortKey::Text(_) => Domain::Text,
            SortKey::UnsignedSmall(_) => Domain::UnsignedSmall,
            SortKey::UnsignedLarge(_) => Domain::UnsignedLarge,
            SortKey::Signed(_) => Domain::Signed,
        }
    }
}

/// Non-empty list of sort keys, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(FlsError::EmptySortSpec);
        }
        Ok(Self { keys })
    }

    /// Build a spec from the raw `--sort` values. No values means sorting
    /// is disabled; values that name no keys at all are an error.
    pub fn from_args<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
        if values.is_empty() {
            return Ok(None);
        }
        let mut keys = Vec::new();
        for value in values {
            parse_sort_value(value.as_ref(), &mut keys)?;
        }
        Self::new(keys).map(Some)
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Comma-separated items; an item is a long key name or a run of
/// one-character tokens.
fn parse_sort_value(value: &str, keys: &mut Vec<SortKey>) -> Result<()> {
    for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(key) = SortKey::from_name(item) {
            keys.push(key);
            continue;
        }
        for token in item.chars() {
            let key = SortKey::from_token(token)
                .ok_or_else(|| FlsError::UnknownSortKey(token.to_string()))?;
            keys.push(key);
        }
    }
    Ok(())
}

//! File records: a path plus the stat attributes read for it

use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use crate::error::{FlsError, Result};

const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

/// Raw stat attributes of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes {
    pub uid: u32,
    pub gid: u32,
    pub size: i64,
    /// File type and permission bits
    pub mode: u32,
    pub inode: u64,
    pub link_count: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

impl Attributes {
    pub fn from_metadata(meta: &fs::Metadata) -> Self {
        Self {
            uid: meta.uid(),
            gid: meta.gid(),
            size: i64::try_from(meta.size()).unwrap_or(i64::MAX),
            mode: meta.mode(),
            inode: meta.ino(),
            link_count: meta.nlink(),
            atime: meta.atime(),
            mtime: meta.mtime(),
            ctime: meta.ctime(),
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_mode(self.mode)
    }

    /// Permission bits including setuid, setgid and sticky.
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// Entry type decoded from the mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    CharDevice,
    BlockDevice,
    Fifo,
    Socket,
    Unknown,
}

impl FileKind {
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => FileKind::Regular,
            S_IFDIR => FileKind::Directory,
            S_IFLNK => FileKind::Symlink,
            S_IFCHR => FileKind::CharDevice,
            S_IFBLK => FileKind::BlockDevice,
            S_IFIFO => FileKind::Fifo,
            S_IFSOCK => FileKind::Socket,
            _ => FileKind::Unknown,
        }
    }

    /// Leading character of an `ls -l` permission string.
    pub fn type_char(self) -> char {
        match self {
            FileKind::Regular | FileKind::Unknown => '-',
            FileKind::Directory => 'd',
            FileKind::Symlink => 'l',
            FileKind::CharDevice => 'c',
            FileKind::BlockDevice => 'b',
            FileKind::Fifo => 'p',
            FileKind::Socket => 's',
        }
    }
}

/// One listed entry. Immutable once read; consumed by exactly one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
    attributes: Attributes,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, attributes: Attributes) -> Self {
        Self {
            path: path.into(),
            attributes,
        }
    }

    /// Stat `path` without following a final symlink.
    pub fn read(path: &Path) -> Result<Self> {
        let meta = fs::symlink_metadata(path).map_err(|source| FlsError::Traversal {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, Attributes::from_metadata(&meta)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn kind(&self) -> FileKind {
        self.attributes.kind()
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == FileKind::Directory
    }

    /// Last path component, or the whole path when there is none (`/`, `..`).
    pub fn basename(&self) -> &OsStr {
        self.path
            .file_name()
            .unwrap_or_else(|| self.path.as_os_str())
    }

    /// Extension without the dot; empty when absent.
    pub fn extension(&self) -> &OsStr {
        self.path.extension().unwrap_or_default()
    }

    /// Basename without its extension.
    pub fn stem(&self) -> &OsStr {
        self.path.file_stem().unwrap_or_else(|| self.basename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_kind_from_mode() {
        assert_eq!(FileKind::from_mode(0o100644), FileKind::Regular);
        assert_eq!(FileKind::from_mode(0o040755), FileKind::Directory);
        assert_eq!(FileKind::from_mode(0o120777), FileKind::Symlink);
        assert_eq!(FileKind::from_mode(0o010600), FileKind::Fifo);
        assert_eq!(FileKind::from_mode(0o140755), FileKind::Socket);
        assert_eq!(FileKind::from_mode(0), FileKind::Unknown);
    }

    #[test]
    fn test_name_parts() {
        let file = File::new("src/archive.tar.gz", Attributes::default());
        assert_eq!(file.basename(), "archive.tar.gz");
        assert_eq!(file.extension(), "gz");
        assert_eq!(file.stem(), "archive.tar");

        let file = File::new("Makefile", Attributes::default());
        assert_eq!(file.extension(), "");
        assert_eq!(file.stem(), "Makefile");

        let file = File::new(".bashrc", Attributes::default());
        assert_eq!(file.extension(), "");
        assert_eq!(file.stem(), ".bashrc");
    }

    #[test]
    fn test_basename_of_root() {
        let file = File::new("/", Attributes::default());
        assert_eq!(file.basename(), "/");
    }

    #[test]
    fn test_read_regular_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, vec![0u8; 4096]).unwrap();

        let file = File::read(&path).unwrap();
        assert_eq!(file.path(), path);
        assert_eq!(file.attributes().size, 4096);
        assert_eq!(file.attributes().link_count, 1);
        assert_eq!(file.kind(), FileKind::Regular);
    }

    #[test]
    fn test_read_does_not_follow_symlink() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        let link = dir.path().join("link");
        symlink(dir.path().join("real"), &link).unwrap();

        let file = File::read(&link).unwrap();
        assert_eq!(file.kind(), FileKind::Symlink);
        assert!(!file.is_dir());
    }

    #[test]
    fn test_read_missing_path_is_traversal_error() {
        let dir = TempDir::new().unwrap();
        let err = File::read(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, FlsError::Traversal { .. }));
    }
}

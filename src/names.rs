//! uid/gid to name resolution
//!
//! Lookups go through the reentrant libc calls and are cached for the
//! lifetime of a listing. An id with no passwd/group entry resolves to
//! `None`; callers fall back to the numeric id.

use std::collections::HashMap;
use std::ffi::CStr;

use tracing::trace;

const INITIAL_BUF: usize = 1024;
const MAX_BUF: usize = 1 << 20;

/// Per-run cache of user and group names.
#[derive(Debug, Default, Clone)]
pub struct NameCache {
    users: HashMap<u32, Option<String>>,
    groups: HashMap<u32, Option<String>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// User name for `uid`, or `None` if the system has no entry.
    pub fn user(&mut self, uid: u32) -> Option<&str> {
        self.users
            .entry(uid)
            .or_insert_with(|| lookup_user(uid))
            .as_deref()
    }

    /// Group name for `gid`, or `None` if the system has no entry.
    pub fn group(&mut self, gid: u32) -> Option<&str> {
        self.groups
            .entry(gid)
            .or_insert_with(|| lookup_group(gid))
            .as_deref()
    }

    /// User name, falling back to the decimal uid.
    pub fn user_or_id(&mut self, uid: u32) -> String {
        match self.user(uid) {
            Some(name) => name.to_string(),
            None => uid.to_string(),
        }
    }

    /// Group name, falling back to the decimal gid.
    pub fn group_or_id(&mut self, gid: u32) -> String {
        match self.group(gid) {
            Some(name) => name.to_string(),
            None => gid.to_string(),
        }
    }

    /// Pre-populate entries so output does not depend on the host's databases.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn with_names(users: &[(u32, &str)], groups: &[(u32, &str)]) -> Self {
        let mut cache = Self::new();
        for (uid, name) in users {
            cache.users.insert(*uid, Some((*name).to_string()));
        }
        for (gid, name) in groups {
            cache.groups.insert(*gid, Some((*name).to_string()));
        }
        cache
    }
}

fn lookup_user(uid: u32) -> Option<String> {
    let mut buf: Vec<libc::c_char> = vec![0; INITIAL_BUF];
    loop {
        // SAFETY: `pwd` and `result` are written by getpwuid_r; `buf` outlives
        // every pointer stored into `pwd`, and its length is passed alongside.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(
                uid as libc::uid_t,
                &mut pwd,
                buf.as_mut_ptr(),
                buf.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE && buf.len() < MAX_BUF {
            let len = buf.len() * 2;
            buf.resize(len, 0);
            continue;
        }
        if rc != 0 || result.is_null() || pwd.pw_name.is_null() {
            trace!(uid, rc, "no passwd entry");
            return None;
        }
        // SAFETY: pw_name points into `buf` and is NUL-terminated on success.
        let name = unsafe { CStr::from_ptr(pwd.pw_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

fn lookup_group(gid: u32) -> Option<String> {
    let mut buf: Vec<libc::c_char> = vec![0; INITIAL_BUF];
    loop {
        // SAFETY: as in `lookup_user`, with getgrgid_r.
        let mut grp: libc::group = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::group = std::ptr::null_mut();
        let rc = unsafe {
            libc::getgrgid_r(
                gid as libc::gid_t,
                &mut grp,
                buf.as_mut_ptr(),
                buf.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE && buf.len() < MAX_BUF {
            let len = buf.len() * 2;
            buf.resize(len, 0);
            continue;
        }
        if rc != 0 || result.is_null() || grp.gr_name.is_null() {
            trace!(gid, rc, "no group entry");
            return None;
        }
        // SAFETY: gr_name points into `buf` and is NUL-terminated on success.
        let name = unsafe { CStr::from_ptr(grp.gr_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_names() {
        let mut cache = NameCache::with_names(&[(1000, "alice")], &[(100, "staff")]);
        assert_eq!(cache.user(1000), Some("alice"));
        assert_eq!(cache.group(100), Some("staff"));
    }

    #[test]
    fn test_unresolvable_id_falls_back_to_number() {
        // Ids this large are not allocated on any sane system.
        let mut cache = NameCache::new();
        assert_eq!(cache.user_or_id(4_000_000_123), "4000000123");
        assert_eq!(cache.group_or_id(4_000_000_123), "4000000123");
    }

    #[test]
    fn test_lookup_is_cached() {
        let mut cache = NameCache::new();
        let first = cache.user_or_id(4_000_000_124);
        assert!(cache.users.contains_key(&4_000_000_124));
        assert_eq!(cache.user_or_id(4_000_000_124), first);
    }
}

//! Pure formatting helpers used by the renderer

use chrono::{Local, TimeZone};

use crate::file::FileKind;

/// Bytes that get a backslash in escaped names.
const SHELL_SPECIAL: &[u8] = b"~\\ #\"'$&;()|<>*?[]`!{}\t\n";

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Prefix shell-special bytes with a backslash. Names are raw bytes and
/// need not be UTF-8; every special byte is ASCII.
pub fn escape_name(name: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len());
    for &b in name {
        if SHELL_SPECIAL.contains(&b) {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

/// `ls -l` style permission string, e.g. `drwxr-xr-x`.
pub fn permission_string(mode: u32) -> String {
    let mut s = String::with_capacity(10);
    s.push(FileKind::from_mode(mode).type_char());

    let special = [(0o4000, 's', 'S'), (0o2000, 's', 'S'), (0o1000, 't', 'T')];
    for (i, shift) in [6u32, 3, 0].into_iter().enumerate() {
        let bits = (mode >> shift) & 0o7;
        s.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        s.push(if bits & 0o2 != 0 { 'w' } else { '-' });

        let (flag, set_exec, set_no_exec) = special[i];
        let exec = bits & 0o1 != 0;
        s.push(match (mode & flag != 0, exec) {
            (true, true) => set_exec,
            (true, false) => set_no_exec,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    s
}

/// Permission bits as four octal digits, e.g. `0644`.
pub fn octal_permissions(mode: u32) -> String {
    format!("{:04o}", mode & 0o7777)
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [char; 4] = ['K', 'M', 'G', 'T'];

    let bytes = bytes.max(0);
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    // Pick the unit after rounding so 1048575 is 1.0M, not 1024.0K.
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while unit + 1 < UNITS.len() && (value * 10.0).round() >= 10240.0 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, UNITS[unit])
}

/// Local time in ISO form; falls back to the raw epoch value when out of range.
pub fn format_timestamp(epoch_secs: i64) -> String {
    match Local.timestamp_opt(epoch_secs, 0).single() {
        Some(t) => t.format(ISO_FORMAT).to_string(),
        None => epoch_secs.to_string(),
    }
}

/// Type indicator in the style of `ls -F`.
pub fn indicator(mode: u32) -> &'static str {
    match FileKind::from_mode(mode) {
        FileKind::Directory => "/",
        FileKind::Symlink => "@",
        FileKind::Socket => "=",
        FileKind::Fifo => "|",
        FileKind::Regular if mode & 0o111 != 0 => "*",
        _ => "",
    }
}

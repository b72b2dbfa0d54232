//! Pure predicates and parsers classifying logical lines.
//!
//! All of these operate on lines prepared by [`crate::reader`]: comments
//! stripped, tabs folded to spaces, surrounding whitespace trimmed.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::stamp::Stamp;

lazy_static! {
    // shape of the content between the brackets of a date stamp;
    // calendar validation happens in Stamp::parse_sql
    static ref RE_STAMP: Regex = Regex::new(
        r"^\s*\d{4}-\d{1,2}-\d{1,2}\s+\d{1,2}:\d{1,2}:\d{1,2}(\s+[+-]\d{2}:?\d{2})?\s*$"
    )
    .unwrap();
}

/// Checks whether `line` carries a bracketed date stamp
/// `[ yyyy-mm-dd hh:mi:ss ]` and returns the stamp if so.
///
/// Lines whose bracket region is too short to hold a stamp fail
/// silently; a bracket region of plausible size with malformed content
/// draws a warning (unless `warn_invalid` is false) and still fails, so
/// a bad tag never aborts a scan. Years before 1995 are rejected.
pub fn is_db_date(line: &str, warn_invalid: bool) -> Option<Stamp> {
    let lbrk = line.find('[')?;
    let rbrk = lbrk + line[lbrk..].find(']')?;
    if rbrk <= lbrk + 11 {
        return None;
    }
    let ts = &line[lbrk + 1..rbrk];
    let stamp = if RE_STAMP.is_match(ts) {
        Stamp::parse_sql(ts)
    } else {
        None
    };
    match stamp {
        Some(s) if s.year() >= 1995 => Some(s),
        _ => {
            if warn_invalid {
                warn!(line = %line, "invalid date tag");
            }
            None
        }
    }
}

/// True if `line` is a database section marker, i.e. it matches
/// `.*\[.+\].*` with at least one non-`]` character inside the brackets.
pub fn is_section_tag(line: &str) -> bool {
    let bytes = line.as_bytes();
    let Some(lbrk) = bytes.iter().position(|&b| b == b'[') else {
        return false;
    };
    match bytes.get(lbrk + 1) {
        None | Some(b']') => false,
        Some(_) => bytes[lbrk + 2..].contains(&b']'),
    }
}

/// True if `line` has the form of an assignment `<text> = [text]`.
/// The comparison operators `==`, `!=`, `<=`, `>=` do not count.
pub fn is_assignment(line: &str) -> bool {
    let Some(pos) = line.find('=') else {
        return false;
    };
    if line[..pos].trim().is_empty() {
        // only whitespace before '=', or '=' at start of line
        return false;
    }
    let bytes = line.as_bytes();
    !(matches!(bytes[pos - 1], b'!' | b'<' | b'>') || bytes.get(pos + 1) == Some(&b'='))
}

/// Outcome of matching a logical line against a key.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyMatch {
    /// The line contains no `=`.
    NoAssignment,
    /// The line assigns to some other key.
    Different,
    /// The line assigns to the key; the value text follows, with
    /// leading whitespace stripped.
    Matched(String),
}

/// Checks whether `line` is of the form `key = value` for exactly this
/// `key`. The left-hand side is space-trimmed and compared byte for
/// byte; trailing whitespace of the value was already removed by the
/// line reader.
pub fn match_key(line: &str, key: &str) -> KeyMatch {
    let Some(eq) = line.find('=') else {
        return KeyMatch::NoAssignment;
    };
    let lhs = line[..eq].trim_matches(' ');
    if lhs.is_empty() || lhs != key {
        return KeyMatch::Different;
    }
    KeyMatch::Matched(line[eq + 1..].trim_start_matches(' ').to_string())
}

/// Removes the trailing level from a dotted prefix, e.g.
/// `"L.vdc.u1." -> "L.vdc."`. Returns the remaining number of dots, or
/// zero after clearing a prefix with nothing left to remove.
pub fn chop_prefix(prefix: &mut String) -> usize {
    if prefix.len() >= 2 {
        if let Some(pos) = prefix[..prefix.len() - 1].rfind('.') {
            prefix.truncate(pos + 1);
            return prefix.matches('.').count();
        }
    }
    prefix.clear();
    0
}

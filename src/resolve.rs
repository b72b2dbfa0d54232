//! Single-pass value resolution and section positioning.
//!
//! [`load_value`] scans a whole file and returns the text assigned to a
//! key under the most recent date stamp that does not postdate the
//! requested date. Records under a stamp later than the request are
//! skipped; when a stamp rewinds the ordering, those blocks are skipped
//! as well, so a value honored under a newer stamp is never overwritten
//! by an older one appearing later in the file. Among assignments under
//! equal stamps, the last one in file order wins, which lets a file
//! restate a key within one block.

use std::io::{BufRead, Seek, SeekFrom};

use crate::error::Result;
use crate::expand::{NoExpand, TextExpander};
use crate::reader::LineReader;
use crate::recognize::{is_db_date, is_section_tag, match_key, KeyMatch};
use crate::stamp::Stamp;

/// Finds the value for `key` governing `date`. `Ok(None)` when the key
/// is absent from the file for that date.
pub fn load_value<R: BufRead + Seek>(file: &mut R, date: Stamp, key: &str) -> Result<Option<String>> {
    load_value_with(file, date, key, &NoExpand)
}

/// [`load_value`] with a text-variable expander applied to every
/// logical line before recognition.
pub fn load_value_with<R: BufRead + Seek>(
    file: &mut R,
    date: Stamp,
    key: &str,
    expander: &dyn TextExpander,
) -> Result<Option<String>> {
    file.seek(SeekFrom::Start(0))?;
    let mut keydate = Stamp::sentinel();
    let mut prevdate = Stamp::sentinel();
    let mut ignore = false;
    let mut value: Option<String> = None;
    let mut reader = LineReader::new(file);
    while let Some(dbline) = reader.read()? {
        for line in expander.expand(dbline) {
            if !ignore {
                match match_key(&line, key) {
                    KeyMatch::Matched(text) => {
                        // found a match under an equal or newer stamp;
                        // keep scanning so the last one wins
                        prevdate = keydate;
                        value = Some(text);
                        continue;
                    }
                    KeyMatch::Different => continue,
                    KeyMatch::NoAssignment => {}
                }
            }
            if let Some(stamp) = is_db_date(&line, true) {
                keydate = stamp;
                ignore = keydate > date || keydate < prevdate;
            }
        }
    }
    Ok(value)
}

/// One physical line with the terminator removed. `Ok(false)` at EOF.
fn next_raw<R: BufRead>(file: &mut R, buf: &mut String) -> Result<bool> {
    buf.clear();
    if file.read_line(buf)? == 0 {
        return Ok(false);
    }
    while buf.ends_with('\n') || buf.ends_with('\r') {
        buf.pop();
    }
    Ok(true)
}

/// Scans forward from the current position for the configuration tag
/// `[label=tag]` (`[tag]` when `label` is empty), ignoring whitespace,
/// and leaves the file positioned on the line after it.
///
/// With `end_on_tag`, the scan stops at the first non-matching section
/// marker. On failure the file is rewound to where the scan started.
/// Useful for segmenting databases for different experimental setups.
pub fn seek_config<R: BufRead + Seek>(
    file: &mut R,
    tag: &str,
    label: &str,
    end_on_tag: bool,
) -> Result<bool> {
    if tag.is_empty() {
        return Ok(false);
    }
    let entry = file.stream_position()?;
    let mut pattern = String::from("[");
    if !label.is_empty() {
        pattern.push_str(label);
        pattern.push('=');
    }
    let mut buf = String::new();
    let mut found = false;
    while next_raw(file, &mut buf)? {
        if buf.is_empty() || buf.starts_with('#') {
            continue;
        }
        let squeezed: String = buf.chars().filter(|c| !c.is_whitespace()).collect();
        match squeezed.find(&pattern) {
            Some(lbrk) if lbrk + pattern.len() < squeezed.len() => {
                let inner = &squeezed[lbrk + pattern.len()..];
                if let Some(rbrk) = inner.find(']') {
                    if &inner[..rbrk] == tag {
                        found = true;
                        break;
                    }
                }
            }
            _ => {
                if end_on_tag && is_section_tag(&buf) {
                    break;
                }
            }
        }
    }
    if !found {
        file.seek(SeekFrom::Start(entry))?;
    }
    Ok(found)
}

/// Scans forward for the date stamp governing `date` and leaves the
/// file positioned on the line after the best match, i.e. after the
/// greatest stamp at or before `date` that does not precede an earlier
/// honored stamp. With `end_on_tag` the scan stops at the first
/// non-qualifying section marker. Rewinds and returns false when no
/// stamp qualifies.
pub fn seek_date<R: BufRead + Seek>(file: &mut R, date: Stamp, end_on_tag: bool) -> Result<bool> {
    let entry = file.stream_position()?;
    let mut prevdate = Stamp::sentinel();
    let mut foundpos: Option<u64> = None;
    let mut buf = String::new();
    while next_raw(file, &mut buf)? {
        if buf.is_empty() || buf.starts_with('#') {
            continue;
        }
        let stamped = match is_db_date(&buf, false) {
            Some(tagdate) if tagdate <= date && tagdate >= prevdate => {
                prevdate = tagdate;
                foundpos = Some(file.stream_position()?);
                true
            }
            _ => false,
        };
        if !stamped && end_on_tag && is_section_tag(&buf) {
            break;
        }
    }
    match foundpos {
        Some(pos) => {
            file.seek(SeekFrom::Start(pos))?;
            Ok(true)
        }
        None => {
            file.seek(SeekFrom::Start(entry))?;
            Ok(false)
        }
    }
}

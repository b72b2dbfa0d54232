//! Assembles logical lines from the physical lines of a database file.
//!
//! A logical line is what the recognizers and the resolver operate on:
//! comments removed, tabs folded to spaces, surrounding whitespace
//! trimmed, and continuations resolved. Two continuation styles exist
//! and may interact:
//!
//! * **explicit** – a physical line ending in `\` joins the next one; a
//!   `#` on a later fragment only strips the comment, it does not end
//!   the continuation;
//! * **implicit** – an assignment line adopts following non-assignment
//!   lines until a blank line, the next assignment, or end of file.
//!
//! When an implicit continuation is canceled by a new assignment, the
//! reader rewinds the file so that line is read again on the next call.
//! The position before every physical read is remembered for exactly
//! this purpose.

use std::io::{BufRead, Seek, SeekFrom};

use crate::error::{DbError, Result};
use crate::recognize::is_assignment;

/// Upper bound on the length of one logical line.
pub const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Default)]
struct LineFlags {
    comment: bool,
    continued: bool,
    leading_space: bool,
    trailing_space: bool,
}

/// Cuts the fragment at the earliest of `#` (comment) or `\`
/// (continuation mark), recording which one it was, then trims while
/// noting whether leading or trailing space was present.
fn prepare_line(linbuf: &mut String) -> LineFlags {
    let mut flags = LineFlags::default();
    if linbuf.is_empty() {
        return flags;
    }
    let hash = linbuf.find('#');
    if hash == Some(0) {
        flags.comment = true;
        linbuf.clear();
        return flags;
    }
    let backslash = linbuf.find('\\');
    let cut = match (hash, backslash) {
        (Some(h), Some(b)) => Some(h.min(b)),
        (h, b) => h.or(b),
    };
    if let Some(pos) = cut {
        if Some(pos) == backslash {
            flags.continued = true;
        } else {
            flags.comment = true;
        }
        linbuf.truncate(pos);
    }
    if !linbuf.is_empty() {
        flags.leading_space = linbuf.starts_with(' ');
        flags.trailing_space = linbuf.ends_with(' ');
        if flags.leading_space || flags.trailing_space {
            let trimmed = linbuf.trim_matches(' ').to_string();
            *linbuf = trimmed;
        }
    }
    flags
}

/// Reads logical lines from an open database file.
pub struct LineReader<'a, R: BufRead + Seek> {
    file: &'a mut R,
}

impl<'a, R: BufRead + Seek> LineReader<'a, R> {
    pub fn new(file: &'a mut R) -> Self {
        Self { file }
    }

    /// One physical line without its terminator, tabs folded to spaces.
    fn next_physical(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.file.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        if buf.contains('\t') {
            buf = buf.replace('\t', " ");
        }
        Ok(Some(buf))
    }

    /// Returns the next non-empty logical line, or `None` at end of
    /// file. Blank lines outside a continuation are skipped silently; a
    /// blank line inside one terminates it.
    pub fn read(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let mut maybe_continued = false;
        let mut at_eof = false;
        let mut oldpos;
        loop {
            oldpos = self.file.stream_position()?;
            let Some(mut linbuf) = self.next_physical()? else {
                at_eof = true;
                break;
            };
            let flags = prepare_line(&mut linbuf);

            if line.is_empty() && linbuf.is_empty() {
                // no line building in progress and no data
                continue;
            }
            let mut starts_assignment = false;
            if !linbuf.is_empty() {
                starts_assignment = is_assignment(&linbuf);
                if maybe_continued && starts_assignment {
                    // A new assignment cancels the tentative
                    // continuation; rewind so it is read again.
                    self.file.seek(SeekFrom::Start(oldpos))?;
                    break;
                }
            } else if flags.continued || flags.comment {
                // empty continuation fragments and comments inside a
                // continuation block are skipped
                continue;
            } else {
                // a blank line ends the continuation; the pending line
                // is complete
                break;
            }

            if line.is_empty() && !flags.continued && starts_assignment {
                // An assignment without a continuation mark may be
                // continued by non-assignment lines. The two styles are
                // never mixed on the same fragment.
                maybe_continued = true;
            }
            let unfinished = flags.continued || maybe_continued;

            // preserve at least one space between fragments where one
            // was originally present
            if maybe_continued || (flags.trailing_space && flags.continued) {
                linbuf.push(' ');
            }
            if flags.leading_space && !line.is_empty() && !line.ends_with(' ') {
                line.push(' ');
            }
            if line.len() + linbuf.len() > MAX_LINE_LEN {
                line.push_str(&linbuf);
                let text: String = line.chars().take(72).collect();
                return Err(DbError::LineTooLong { text });
            }
            line.push_str(&linbuf);
            if !unfinished {
                break;
            }
        }
        if maybe_continued {
            if at_eof {
                // the last line of the file was a key; give it back and
                // report end of file on the next call instead
                self.file.seek(SeekFrom::Start(oldpos))?;
                at_eof = false;
            }
            // tidy up the tentative trailing space
            if line.ends_with(' ') {
                line.pop();
            }
        }
        if at_eof || line.is_empty() {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

//! Locates database files on disk for a logical name and run date.
//!
//! Databases live under a root directory chosen from `$DB_DIR`, `DB`,
//! `db`, `.` (first one that can be listed). Inside it, subdirectories
//! named `YYYYMMDD` hold the files valid from that date on, a `DEFAULT`
//! subdirectory holds fallbacks, and files may also sit in the root:
//!
//! ```text
//! <DB_DIR>/20200101/db_vdc.dat
//! <DB_DIR>/DEFAULT/db_vdc.dat
//! <DB_DIR>/db_vdc.dat
//! ./db_vdc.dat
//! ```

use std::env;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use tracing::{debug, error};

use crate::error::{DbError, Result};
use crate::stamp::Stamp;

const DEFAULT_DIR: &str = "DEFAULT";

/// Returns the ordered candidate paths for `name` at `date`, most
/// specific first. A name containing `/` is returned verbatim as the
/// only candidate.
pub fn db_file_list(name: &str, date: Stamp) -> Vec<PathBuf> {
    let mut fnames = Vec::new();
    if name.is_empty() {
        return fnames;
    }
    if name.contains('/') {
        fnames.push(PathBuf::from(name));
        return fnames;
    }

    // The first database directory that can be listed wins; the rest
    // are ignored.
    let mut dnames: Vec<PathBuf> = Vec::new();
    if let Some(dbdir) = env::var_os("DB_DIR") {
        dnames.push(PathBuf::from(dbdir));
    }
    dnames.push(PathBuf::from("DB"));
    dnames.push(PathBuf::from("db"));
    dnames.push(PathBuf::from("."));

    let mut chosen = None;
    for dir in dnames {
        if let Ok(entries) = fs::read_dir(&dir) {
            chosen = Some((dir, entries));
            break;
        }
    }
    let Some((thedir, entries)) = chosen else {
        error!("Cannot open any database directories. Check your disk!");
        return fnames;
    };

    // Collect date-coded subdirectories and note a DEFAULT entry.
    let mut time_dirs: Vec<String> = Vec::new();
    let mut have_default = false;
    for entry in entries.flatten() {
        let item = entry.file_name().to_string_lossy().into_owned();
        if item.len() == 8 && item.bytes().all(|b| b.is_ascii_digit()) {
            time_dirs.push(item);
        } else if item == DEFAULT_DIR {
            have_default = true;
        }
    }
    time_dirs.sort();

    // The greatest date directory at or before the requested date; the
    // last one stays valid until infinity, and nothing is selected when
    // the date precedes the earliest.
    let code = date.date_code();
    let selected = time_dirs
        .iter()
        .rev()
        .find(|d| d.parse::<u32>().map_or(false, |c| c <= code));

    let filename = normalize(name);
    fnames.push(PathBuf::from(format!("./{filename}")));
    if let Some(sub) = selected {
        fnames.push(thedir.join(sub).join(&filename));
    }
    if have_default {
        fnames.push(thedir.join(DEFAULT_DIR).join(&filename));
    }
    fnames.push(thedir.join(&filename));

    fnames
}

/// Normalizes a logical name to the `db_<name>.dat` convention.
/// Subdetectors share the files of their parent detectors.
fn normalize(name: &str) -> String {
    let mut filename = name.to_string();
    if !filename.starts_with("db_") {
        filename.insert_str(0, "db_");
    }
    if filename.ends_with('.') {
        filename.push_str("dat");
    } else if !filename.ends_with(".dat") {
        filename.push_str(".dat");
    }
    filename
}

/// Opens the first existing candidate for `name` at `date` and returns
/// the file together with the path that worked.
pub fn open_db_file(name: &str, date: Stamp, here: &str) -> Result<(File, PathBuf)> {
    for path in db_file_list(name, date) {
        match File::open(&path) {
            Ok(file) => {
                debug!(here, path = %path.display(), "opened database file");
                return Ok((file, path));
            }
            Err(e) => debug!(here, path = %path.display(), error = %e, "candidate failed"),
        }
    }
    error!(here, "Cannot open database file for \"{name}\"");
    Err(DbError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no database file found for \"{name}\""),
    )))
}

//! Rundb – a time-versioned, plain-text key/value database for detector
//! run conditions.
//!
//! A database is a set of text files holding `key = value` assignments
//! grouped under bracketed SQL-style date stamps. Values recorded under a
//! stamp apply to every run date at or after that stamp, until a newer
//! stamp supersedes them. This crate is the read side: it locates the
//! file responsible for a run date, scans it, and materializes typed
//! values into caller-provided destinations.
//!
//! ## Modules
//! * [`stamp`] – The [`stamp::Stamp`] date-time governing database records.
//! * [`reader`] – Assembly of logical lines (comments, tab folding, two
//!   continuation styles) from an open file.
//! * [`recognize`] – Predicates classifying a logical line as a date
//!   stamp, section tag, or assignment, plus the key matcher.
//! * [`expand`] – The [`expand::TextExpander`] seam for text-variable
//!   substitution, with a no-op default.
//! * [`resolve`] – The single-pass value resolver implementing the
//!   most-recent-but-not-after stamp semantics, and positioning helpers
//!   for named configuration sections.
//! * [`convert`] – Conversion of text values to numeric scalars, vectors
//!   and matrices with strict format and range checking.
//! * [`request`] – Typed request lists and the [`request::Loader`] that
//!   drives the resolver and converters, with hierarchical prefix
//!   fallback.
//! * [`search`] – Candidate path enumeration for date-coded database
//!   directory trees, honoring the `DB_DIR` environment variable.
//!
//! ## File Format
//! ```text
//! # comments run to end of line
//! [ 2020-01-01 00:00:00 ]
//! L.vdc.u1.nw     = 368
//! L.vdc.u1.wbeg   = -0.508425
//! L.vdc.u1.tdc.offsets =
//!     1320 1321 1318 1319
//!     1317 1322 1315 1316
//! ```
//! Assignments adopt following non-assignment lines until a blank line
//! or the next assignment; a trailing `\` joins lines explicitly. Tabs
//! count as spaces.
//!
//! ## Quick Start
//! ```
//! use std::io::Cursor;
//! use rundb::{load_db, DbRequest, Dest, Stamp};
//!
//! let mut file = Cursor::new("[ 2020-01-01 00:00:00 ]\nL.nw = 368\n");
//! let date = Stamp::from_ymd_hms(2021, 6, 1, 0, 0, 0).unwrap();
//! let mut nw: u32 = 0;
//! let mut requests = [DbRequest::new("nw", Dest::U32(&mut nw))];
//! load_db(&mut file, date, &mut requests, "L.vdc.u1.", 1, "QuickStart").unwrap();
//! drop(requests);
//! assert_eq!(nw, 368);
//! ```
//!
//! ## Status Codes
//! All fallible operations return [`error::Result`]; callers that need
//! the numeric status conventions of the file format can map an error
//! through [`error::DbError::code`].
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT.

pub mod convert;
pub mod error;
pub mod expand;
pub mod reader;
pub mod recognize;
pub mod request;
pub mod resolve;
pub mod search;
pub mod stamp;

pub use convert::{load_array, load_matrix, load_scalar, Scalar};
pub use error::{DbError, Result};
pub use expand::{NoExpand, TextExpander};
pub use reader::LineReader;
pub use request::{load_db, DbRequest, Dest, Loader};
pub use resolve::{load_value, load_value_with, seek_config, seek_date};
pub use search::{db_file_list, open_db_file};
pub use stamp::Stamp;

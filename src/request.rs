//! Typed request lists and the loader that fills them.
//!
//! A caller describes what it wants as a slice of [`DbRequest`] items,
//! each naming a key (relative to a common dotted prefix) and lending a
//! destination. [`Loader::load`] resolves and converts every item in
//! order. Keys missing at the full prefix are retried one level up
//! along the dotted name tree, so detector planes inherit values from
//! their parent detector or from the top level.

use std::io::{BufRead, Seek};

use tracing::error;

use crate::convert::{to_array, to_matrix, to_scalar, Scalar};
use crate::error::{DbError, Result};
use crate::expand::{NoExpand, TextExpander};
use crate::recognize::chop_prefix;
use crate::resolve::load_value_with;
use crate::stamp::Stamp;

// ------------- Requests -------------

/// Caller-provided destination. The variant selects the conversion
/// pipeline applied to the value text.
#[derive(Debug)]
pub enum Dest<'a> {
    F64(&'a mut f64),
    F32(&'a mut f32),
    I64(&'a mut i64),
    U64(&'a mut u64),
    I32(&'a mut i32),
    U32(&'a mut u32),
    I16(&'a mut i16),
    U16(&'a mut u16),
    I8(&'a mut i8),
    U8(&'a mut u8),
    /// The value text verbatim, internal spaces included.
    Text(&'a mut String),
    F32Vec(&'a mut Vec<f32>),
    F64Vec(&'a mut Vec<f64>),
    I32Vec(&'a mut Vec<i32>),
    F32Mat(&'a mut Vec<Vec<f32>>),
    F64Mat(&'a mut Vec<Vec<f64>>),
    I32Mat(&'a mut Vec<Vec<i32>>),
}

/// One item of a typed request list.
#[derive(Debug)]
pub struct DbRequest<'a> {
    /// Key name, appended to the load prefix.
    pub name: &'a str,
    pub dest: Dest<'a>,
    /// Expected element count for vectors (0 = unconstrained), or the
    /// column count for matrices. Ignored for scalars and strings.
    pub nelem: usize,
    /// A missing optional item succeeds silently, leaving the
    /// destination untouched.
    pub optional: bool,
    /// Per-item fallback budget; 0 defers to the loader's global one.
    pub search: i32,
    /// Free-text description used in diagnostics.
    pub descript: Option<&'a str>,
}

impl<'a> DbRequest<'a> {
    pub fn new(name: &'a str, dest: Dest<'a>) -> Self {
        Self {
            name,
            dest,
            nelem: 0,
            optional: false,
            search: 0,
            descript: None,
        }
    }
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
    pub fn expect(mut self, nelem: usize) -> Self {
        self.nelem = nelem;
        self
    }
    pub fn search(mut self, search: i32) -> Self {
        self.search = search;
        self
    }
    pub fn describe(mut self, descript: &'a str) -> Self {
        self.descript = Some(descript);
        self
    }
}

fn assign_vec<T: Scalar>(dest: &mut Vec<T>, key: &str, text: &str, nelem: usize) -> Result<()> {
    let values = to_array(key, text)?;
    if nelem > 0 && values.len() != nelem {
        return Err(DbError::LengthMismatch {
            key: key.to_string(),
            expected: nelem,
            found: values.len(),
        });
    }
    *dest = values;
    Ok(())
}

fn apply(dest: &mut Dest<'_>, key: &str, text: &str, nelem: usize) -> Result<()> {
    match dest {
        Dest::F64(d) => **d = to_scalar(key, text)?,
        Dest::F32(d) => **d = to_scalar(key, text)?,
        Dest::I64(d) => **d = to_scalar(key, text)?,
        Dest::U64(d) => **d = to_scalar(key, text)?,
        Dest::I32(d) => **d = to_scalar(key, text)?,
        Dest::U32(d) => **d = to_scalar(key, text)?,
        Dest::I16(d) => **d = to_scalar(key, text)?,
        Dest::U16(d) => **d = to_scalar(key, text)?,
        Dest::I8(d) => **d = to_scalar(key, text)?,
        Dest::U8(d) => **d = to_scalar(key, text)?,
        Dest::Text(d) => **d = text.to_string(),
        Dest::F32Vec(d) => assign_vec(d, key, text, nelem)?,
        Dest::F64Vec(d) => assign_vec(d, key, text, nelem)?,
        Dest::I32Vec(d) => assign_vec(d, key, text, nelem)?,
        Dest::F32Mat(d) => **d = to_matrix(key, text, nelem)?,
        Dest::F64Mat(d) => **d = to_matrix(key, text, nelem)?,
        Dest::I32Mat(d) => **d = to_matrix(key, text, nelem)?,
    }
    Ok(())
}

// ------------- Loader -------------

/// Call context for one load: the diagnostic location label, the
/// substitution seam, and the top-level prefix under which failures are
/// reported.
pub struct Loader<'a> {
    here: &'a str,
    expander: &'a dyn TextExpander,
    report_prefix: String,
}

impl<'a> Loader<'a> {
    pub fn new(here: &'a str) -> Self {
        Self {
            here,
            expander: &NoExpand,
            report_prefix: String::new(),
        }
    }

    pub fn with_expander(here: &'a str, expander: &'a dyn TextExpander) -> Self {
        Self {
            here,
            expander,
            report_prefix: String::new(),
        }
    }

    /// Fills every request in `requests` from `file` for the given run
    /// date. Items already populated when a later item fails remain
    /// populated.
    pub fn load<R: BufRead + Seek>(
        &mut self,
        file: &mut R,
        date: Stamp,
        requests: &mut [DbRequest<'_>],
        prefix: &str,
        global_search: i32,
    ) -> Result<()> {
        self.report_prefix = prefix.to_string();
        let outcome = self.load_items(file, date, requests, prefix, global_search);
        if let Err(err) = &outcome {
            self.report(err);
        }
        outcome
    }

    fn load_items<R: BufRead + Seek>(
        &self,
        file: &mut R,
        date: Stamp,
        requests: &mut [DbRequest<'_>],
        prefix: &str,
        global_search: i32,
    ) -> Result<()> {
        for (index, item) in requests.iter_mut().enumerate() {
            let key = format!("{}{}", prefix, item.name);
            if self.try_item(file, date, &key, item)? {
                continue;
            }
            // Retry one level up along the dotted name tree per step.
            // Example: key "nw", prefix "L.vdc.u1.", search 1 looks for
            // L.vdc.u1.nw -> L.vdc.nw -> L.nw -> nw. A negative budget
            // caps the number of ascensions at its magnitude; a
            // positive budget N stops once above level N (the top
            // level, empty prefix, is level 1).
            let mut budget = if item.search != 0 {
                item.search
            } else {
                global_search
            };
            let mut chain = prefix.to_string();
            let mut last_key = key;
            let mut resolved = false;
            while budget != 0 && !chain.is_empty() {
                let newlevel = chop_prefix(&mut chain) as i32 + 1;
                if budget > 0 && newlevel < budget {
                    break;
                }
                if budget < 0 {
                    budget += 1;
                }
                last_key = format!("{}{}", chain, item.name);
                if self.try_item(file, date, &last_key, item)? {
                    resolved = true;
                    break;
                }
            }
            if resolved || item.optional {
                continue;
            }
            return Err(DbError::Missing {
                key: last_key,
                descript: item.descript.map(str::to_owned),
                index,
            });
        }
        Ok(())
    }

    /// Resolves and assigns one key. `Ok(false)` when the key is not in
    /// the file; conversion failures are hard errors.
    fn try_item<R: BufRead + Seek>(
        &self,
        file: &mut R,
        date: Stamp,
        key: &str,
        item: &mut DbRequest<'_>,
    ) -> Result<bool> {
        let Some(text) = load_value_with(file, date, key, self.expander)? else {
            return Ok(false);
        };
        apply(&mut item.dest, key, &text, item.nelem)?;
        Ok(true)
    }

    fn report(&self, err: &DbError) {
        let here = here_label(self.here, &self.report_prefix);
        match err {
            DbError::Missing {
                key,
                descript: Some(d),
                ..
            } => {
                error!(here = %here, "Required key \"{key}\" ({d}) missing in the database.")
            }
            DbError::Missing { key, .. } => {
                error!(here = %here, "Required key \"{key}\" missing in the database.")
            }
            DbError::Conversion { key, text } => {
                error!(here = %here, "Numerical conversion error: {key} = \"{text}\".")
            }
            DbError::LengthMismatch {
                key,
                expected,
                found,
            } => {
                error!(
                    here = %here,
                    "Incorrect number of array elements found for key = {key}. \
                     {expected} requested, {found} found. Fix database."
                )
            }
            DbError::MatrixShape { key, .. } => {
                error!(
                    here = %here,
                    "Number of matrix elements not evenly divisible by requested \
                     number of columns for key = {key}. Fix the database!"
                )
            }
            DbError::LineTooLong { text } => {
                error!(here = %here, "Text line too long. Fix the database!\n\"{text}...\"")
            }
            DbError::Io(e) => {
                error!(here = %here, "Database read error: {e}")
            }
        }
    }
}

/// Fills `requests` using the default no-op expander.
pub fn load_db<R: BufRead + Seek>(
    file: &mut R,
    date: Stamp,
    requests: &mut [DbRequest<'_>],
    prefix: &str,
    global_search: i32,
    here: &str,
) -> Result<()> {
    Loader::new(here).load(file, date, requests, prefix, global_search)
}

/// Formats the diagnostic location label: `("prefix")::method`, or
/// `Class("prefix")::method` when the method names its type. The
/// trailing dot of the prefix is dropped.
pub fn here_label(method: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return method.to_string();
    }
    let decorated = format!("(\"{}\")", prefix.strip_suffix('.').unwrap_or(prefix));
    match method.find("::") {
        Some(pos) => format!("{}{}{}", &method[..pos], decorated, &method[pos..]),
        None => format!("{}::{}", decorated, method),
    }
}

//! Injection seam for text-variable substitution.
//!
//! Databases may contain variables (`${arm}` and the like) that an
//! outer layer substitutes before recognition. The resolver applies the
//! expander to every logical line after continuation assembly; one line
//! may expand to several, which is mainly useful on the left-hand side
//! of assignments (one template line producing a key per detector arm).

/// Expands one logical line into zero or more output lines.
pub trait TextExpander {
    fn expand(&self, line: String) -> Vec<String>;
}

/// Default expander that passes every line through untouched.
pub struct NoExpand;

impl TextExpander for NoExpand {
    fn expand(&self, line: String) -> Vec<String> {
        vec![line]
    }
}

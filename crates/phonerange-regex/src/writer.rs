//! Rendering edges as regular-expression text.

use phonerange_core::DigitMask;

use crate::any_path::AnyPath;
use crate::edge::Edge;

/// Renders an [`Edge`] tree to a regex string.
///
/// Consecutive any-digit children of a sequence merge into one quantified
/// token, and a group whose members are all any-digit shapes renders
/// through the [`AnyPath`] encoder instead of as a disjunction. The
/// top-level group of the whole expression drops its enclosing
/// parentheses when it is not optional.
pub struct EdgeWriter {
    dot: bool,
}

impl Default for EdgeWriter {
    fn default() -> Self {
        EdgeWriter::new()
    }
}

impl EdgeWriter {
    pub fn new() -> EdgeWriter {
        EdgeWriter { dot: false }
    }

    /// Renders the any-digit token as `.` instead of `\d`; only sound
    /// when the caller guarantees digit-only input.
    pub fn with_dot_match() -> EdgeWriter {
        EdgeWriter { dot: true }
    }

    pub fn to_regex(&self, edge: &Edge) -> String {
        let mut out = String::new();
        self.write(edge, true, &mut out);
        out
    }

    fn token(&self) -> &'static str {
        if self.dot { "." } else { "\\d" }
    }

    fn write(&self, edge: &Edge, top_level: bool, out: &mut String) {
        if let Some(path) = edge.as_any_path() {
            out.push_str(&path.to_regex(self.token()));
            return;
        }
        match edge {
            Edge::Simple { mask, optional } => {
                self.write_mask(*mask, *optional, out);
            }
            Edge::Sequence(children) => {
                // Runs of any-digit children join into one quantifier.
                let mut pending: Option<AnyPath> = None;
                for child in children {
                    match child.as_any_path() {
                        Some(path) => {
                            pending = Some(match pending {
                                Some(run) => run.join(path),
                                None => path,
                            });
                        }
                        None => {
                            self.flush(&mut pending, out);
                            self.write(child, false, out);
                        }
                    }
                }
                self.flush(&mut pending, out);
            }
            Edge::Group { members, optional } => {
                if let [Edge::Simple { mask, optional: false }] = members.as_slice() {
                    // A lone simple member folds its group's optionality.
                    self.write_mask(*mask, *optional, out);
                    return;
                }
                let bare = top_level && !optional;
                if !bare {
                    out.push_str("(?:");
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    self.write(member, false, out);
                }
                if !bare {
                    out.push(')');
                    if *optional {
                        out.push('?');
                    }
                }
            }
        }
    }

    fn flush(&self, pending: &mut Option<AnyPath>, out: &mut String) {
        if let Some(path) = pending.take() {
            out.push_str(&path.to_regex(self.token()));
        }
    }

    fn write_mask(&self, mask: DigitMask, optional: bool, out: &mut String) {
        // Non-all masks print in their canonical textual form, which is
        // already valid regex (a digit or a bracket class).
        out.push_str(&mask.to_string());
        if optional {
            out.push('?');
        }
    }
}

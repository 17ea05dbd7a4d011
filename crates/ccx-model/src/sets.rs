//! Named element sets.
//!
//! All members of all sets live in one flat array; each named set is a
//! half-open span of it. A member is either a literal element id or a generate
//! range. Ranges are expanded lazily, from the upper anchor downwards.

use std::ops::Range;

use crate::error::{ModelError, Result};
use crate::names::normalize_name;

/// One entry of an element set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMember {
    Literal(i32),
    /// Inclusive range; `to` is always reachable from `from` in `step` increments.
    Range { from: i32, to: i32, step: i32 },
}

impl SetMember {
    /// Builds a generate range, pulling `to` down onto the last id the step reaches.
    pub fn range(set: &str, from: i32, to: i32, step: i32) -> Result<Self> {
        if step == 0 {
            return Err(ModelError::ZeroStep {
                set: set.to_string(),
            });
        }
        if step < 0 || from > to {
            return Err(ModelError::InvalidRange {
                set: set.to_string(),
                from,
                to,
                step,
            });
        }
        let to = from + (to - from) / step * step;
        Ok(SetMember::Range { from, to, step })
    }

    /// Member ids, generated from the upper anchor down to the lower one.
    pub fn ids(&self) -> MemberIds {
        match *self {
            SetMember::Literal(id) => MemberIds {
                next: Some(id),
                lower: id,
                step: 1,
            },
            SetMember::Range { from, to, step } => MemberIds {
                next: Some(to),
                lower: from,
                step,
            },
        }
    }

    pub fn count(&self) -> usize {
        match *self {
            SetMember::Literal(_) => 1,
            SetMember::Range { from, to, step } => ((to - from) / step) as usize + 1,
        }
    }
}

/// Descending expansion of a single [`SetMember`].
#[derive(Debug, Clone)]
pub struct MemberIds {
    next: Option<i32>,
    lower: i32,
    step: i32,
}

impl Iterator for MemberIds {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let current = self.next?;
        self.next = current
            .checked_sub(self.step)
            .filter(|&following| following >= self.lower);
        Some(current)
    }
}

/// Decodes the legacy flat encoding, where a non-positive entry `-step`
/// turns the two entries before it into the bounds of a generate range.
/// Sets in that form enter the model through [`ElementSets::define_flat`].
///
/// `[10, 100, -2]` becomes `Range { from: 10, to: 100, step: 2 }`.
pub fn decode_flat(set: &str, flat: &[i32]) -> Result<Vec<SetMember>> {
    let mut members: Vec<SetMember> = Vec::with_capacity(flat.len());
    for (position, &entry) in flat.iter().enumerate() {
        if entry > 0 {
            members.push(SetMember::Literal(entry));
            continue;
        }
        let step = -entry;
        if step == 0 {
            return Err(ModelError::ZeroStep {
                set: set.to_string(),
            });
        }
        let to = members.pop();
        let from = members.pop();
        match (from, to) {
            (Some(SetMember::Literal(from)), Some(SetMember::Literal(to))) => {
                members.push(SetMember::range(set, from, to, step)?);
            }
            _ => {
                return Err(ModelError::DanglingStep {
                    set: set.to_string(),
                    position,
                });
            }
        }
    }
    Ok(members)
}

#[derive(Debug, Clone)]
struct NamedSet {
    name: String,
    span: Range<usize>,
}

/// A set found by name, borrowing its members from the flat array.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSet<'a> {
    pub name: &'a str,
    pub members: &'a [SetMember],
}

impl<'a> ResolvedSet<'a> {
    /// Expanded element ids, member by member.
    pub fn ids(&self) -> impl Iterator<Item = i32> + 'a {
        self.members.iter().flat_map(SetMember::ids)
    }

    pub fn len(&self) -> usize {
        self.members.iter().map(SetMember::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Collection of all element sets in the model
#[derive(Debug, Clone, Default)]
pub struct ElementSets {
    members: Vec<SetMember>,
    sets: Vec<NamedSet>,
}

impl ElementSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a set or appends to an existing one.
    ///
    /// Appending moves the set's span to the end of the flat array; the old
    /// entries stay where they are and are no longer referenced.
    pub fn define(&mut self, raw_name: &str, members: &[SetMember]) -> Result<()> {
        let name = normalize_name(raw_name)?;
        let start = self.members.len();
        match self.sets.iter_mut().find(|s| s.name == name) {
            Some(set) => {
                let previous = set.span.clone();
                self.members.extend_from_within(previous);
                self.members.extend_from_slice(members);
                set.span = start..self.members.len();
            }
            None => {
                self.members.extend_from_slice(members);
                self.sets.push(NamedSet {
                    name,
                    span: start..self.members.len(),
                });
            }
        }
        Ok(())
    }

    /// Defines or extends a set from the legacy flat encoding.
    pub fn define_flat(&mut self, raw_name: &str, flat: &[i32]) -> Result<()> {
        let members = decode_flat(raw_name, flat)?;
        self.define(raw_name, &members)
    }

    /// Looks up a set by (already normalized) name.
    pub fn lookup(&self, name: &str) -> Option<ResolvedSet<'_>> {
        self.sets.iter().find(|s| s.name == name).map(|s| ResolvedSet {
            name: &s.name,
            members: &self.members[s.span.clone()],
        })
    }

    /// Normalizes `raw_name` and resolves it, failing if the set does not exist.
    pub fn resolve(&self, raw_name: &str) -> Result<ResolvedSet<'_>> {
        let name = normalize_name(raw_name)?;
        self.lookup(&name).ok_or(ModelError::UndefinedSet(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

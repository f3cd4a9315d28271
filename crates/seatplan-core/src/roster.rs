//! Attendee roster.
//!
//! Attendees are identified only by their position in the roster, so the
//! order of entries must stay stable once assignments refer to them.

use crate::entity::AttendeeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Characters of the first name kept by [`Attendee::short_name`].
const SHORT_NAME_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub last_name: String,
    pub first_name: String,
}

impl Attendee {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (true, _) => self.last_name.clone(),
            (_, true) => self.first_name.clone(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Compact seat label: up to six characters of the first name plus the
    /// last-name initial, e.g. "Alexan B.". Display only.
    pub fn short_name(&self) -> String {
        let first: String = self.first_name.chars().take(SHORT_NAME_CHARS).collect();
        match self.last_name.chars().next() {
            Some(initial) if first.is_empty() => format!("{initial}."),
            Some(initial) => format!("{first} {initial}."),
            None => first,
        }
    }
}

/// The attendee list plus the set of entries excluded from seating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    attendees: Vec<Attendee>,
    #[serde(default)]
    disabled: BTreeSet<AttendeeIndex>,
}

impl Roster {
    pub fn new(attendees: Vec<Attendee>) -> Self {
        Self {
            attendees,
            disabled: BTreeSet::new(),
        }
    }

    pub fn get(&self, idx: AttendeeIndex) -> Option<&Attendee> {
        self.attendees.get(idx)
    }

    pub fn len(&self) -> usize {
        self.attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attendees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttendeeIndex, &Attendee)> {
        self.attendees.iter().enumerate()
    }

    /// Append an attendee, returning its index.
    pub fn push(&mut self, attendee: Attendee) -> AttendeeIndex {
        self.attendees.push(attendee);
        self.attendees.len() - 1
    }

    pub fn is_disabled(&self, idx: AttendeeIndex) -> bool {
        self.disabled.contains(&idx)
    }

    /// Whether the attendee exists and may be seated.
    pub fn is_eligible(&self, idx: AttendeeIndex) -> bool {
        idx < self.attendees.len() && !self.is_disabled(idx)
    }

    /// Flip the disabled flag only. Use `SeatingPlan::disable_attendee` to
    /// also clear an existing assignment.
    pub(crate) fn set_disabled(&mut self, idx: AttendeeIndex, disabled: bool) {
        if disabled {
            self.disabled.insert(idx);
        } else {
            self.disabled.remove(&idx);
        }
    }

    pub fn disabled(&self) -> &BTreeSet<AttendeeIndex> {
        &self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(Attendee::new("Bell", "Alexander").short_name(), "Alexan B.");
        assert_eq!(Attendee::new("Ng", "Al").short_name(), "Al N.");
        assert_eq!(Attendee::new("", "Prince").short_name(), "Prince");
        assert_eq!(Attendee::new("Cher", "").short_name(), "C.");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(Attendee::new("Hopper", "Grace").full_name(), "Grace Hopper");
        assert_eq!(Attendee::new("Hopper", "").full_name(), "Hopper");
    }

    #[test]
    fn test_eligibility() {
        let mut roster = Roster::new(vec![Attendee::new("A", "a"), Attendee::new("B", "b")]);
        assert!(roster.is_eligible(1));
        roster.set_disabled(1, true);
        assert!(!roster.is_eligible(1));
        assert!(!roster.is_eligible(5));
        roster.set_disabled(1, false);
        assert!(roster.is_eligible(1));
    }
}

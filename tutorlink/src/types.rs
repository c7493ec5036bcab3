//! Common type definitions shared across the crate.
//!
//! All entity IDs are UUIDs wrapped in type aliases for readability:
//!
//! - [`UserId`]: account identifier
//! - [`TeacherId`]: tutor profile identifier (distinct from the owning user)
//! - [`PostId`]: student post-requirement identifier
//! - [`ContactId`] / [`ApplicationId`] / [`PaymentId`]: workflow records
//! - [`ResourceId`]: subject-resources document identifier

use uuid::Uuid;

pub type UserId = Uuid;
pub type TeacherId = Uuid;
pub type PostId = Uuid;
pub type ContactId = Uuid;
pub type ApplicationId = Uuid;
pub type PaymentId = Uuid;
pub type ResourceId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// The fixed, ordered teaching-level scale.
///
/// A tutor's `[from_level, to_level]` interval on this scale must contain a
/// post's required level for the subject to count as a match.
pub const LEVELS: [&str; 20] = [
    "Beginner",
    "Intermediate",
    "Advanced",
    "Expert",
    "Grade 1",
    "Grade 2",
    "Grade 3",
    "Grade 4",
    "Grade 5",
    "Grade 6",
    "Grade 7",
    "Grade 8",
    "Grade 9",
    "Grade 10",
    "Grade 11",
    "Grade 12",
    "Diploma",
    "Bachelor's",
    "Master's",
    "PhD",
];

/// Position of a level name on the scale, case-insensitive. `None` for
/// unknown level names.
pub fn level_index(level: &str) -> Option<usize> {
    LEVELS.iter().position(|l| l.eq_ignore_ascii_case(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_index_is_case_insensitive() {
        assert_eq!(level_index("beginner"), Some(0));
        assert_eq!(level_index("GRADE 10"), Some(13));
        assert_eq!(level_index("PhD"), Some(19));
        assert_eq!(level_index("Kindergarten"), None);
    }

    #[test]
    fn abbrev_uuid_takes_first_eight_chars() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}

//! Strings computed from joined columns at read time
//!
//! Concatenation follows SQL semantics: a null operand makes the whole
//! result null.

/// `first last`
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

/// `start - end`, or `None` when either bound is missing.
pub fn date_frame(start_date: Option<&str>, end_date: Option<&str>) -> Option<String> {
    match (start_date, end_date) {
        (Some(start), Some(end)) => Some(format!("{} - {}", start, end)),
        _ => None,
    }
}

/// `email, phone`
pub fn contact_line(email: &str, phone: &str) -> String {
    format!("{}, {}", email, phone)
}

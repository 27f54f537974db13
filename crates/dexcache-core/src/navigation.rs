//! Previous/next stepping through record ids.

/// Id before `current`, never below 1.
pub fn previous_id(current: u32) -> u32 {
    current.saturating_sub(1).max(1)
}

pub fn next_id(current: u32) -> u32 {
    current.saturating_add(1)
}

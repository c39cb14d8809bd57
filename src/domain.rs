// Domain logic module
// Pure functions and data types with no external side effects

pub mod backoff;
pub mod draft;
pub mod issue_number;

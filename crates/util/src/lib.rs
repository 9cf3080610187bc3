//! Helpers shared by the mcpdash crates: secret redaction, timestamp
//! formatting, and profile persistence.

pub mod date_handling;
pub mod profile;
pub mod text_processing;

pub use date_handling::{MISSING_TIMESTAMP, format_date, format_date_time, parse_timestamp};
pub use profile::{PROFILE_PATH_ENV, Profile, ProfileError, default_profile_path, expand_tilde};
pub use text_processing::{redact_sensitive, truncate_to_width};

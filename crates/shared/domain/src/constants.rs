//! Well-known storage keys.

/// Key of the single JSON mapping that holds every cached analysis.
pub const ANALYSIS_CACHE_KEY: &str = "analysis_cache";

/// Key of the encrypted self-assessment profile envelope.
pub const PROFILE_KEY: &str = "user_profile_encrypted";

pub const SESSIONS: &str = "sessions";
pub const SESSION_RESULTS: &str = "session_results";
pub const CONFIG_VERSIONS: &str = "config_versions";

// Secondary index trees
pub const SESSIONS_BY_CREATED_AT: &str = "sessions_by_created_at";

/// Maximum request body size: 8 MiB.
pub const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Default page size for session listings.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound on the requested page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Longest accepted session label, in characters.
pub const MAX_LABEL_CHARS: usize = 120;

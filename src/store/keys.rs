pub fn session_key(session_id: &str) -> String {
    session_id.to_string()
}

/// Newest-first index entry: reversed creation time, then the id.
pub fn session_created_index_key(created_at_ms: i64, session_id: &str) -> String {
    let ts = created_at_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{:020}:{}", reverse_ts, session_id)
}

/// Zero-padded frame index so a prefix scan yields frame order.
pub fn session_result_key(session_id: &str, frame_index: u64) -> String {
    format!("{}:{:020}", session_id, frame_index)
}

pub fn session_result_prefix(session_id: &str) -> String {
    format!("{}:", session_id)
}

pub fn frame_index_from_result_key(key: &[u8]) -> Option<u64> {
    let key = std::str::from_utf8(key).ok()?;
    key.rsplit(':').next()?.parse().ok()
}

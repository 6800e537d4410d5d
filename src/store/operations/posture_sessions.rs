use chrono::{DateTime, Utc};
use posture_core::{BatchReport, EvaluationResult, PostureType};
use serde::{Deserialize, Serialize};
use sled::transaction::{
    abort, ConflictableTransactionError, ConflictableTransactionResult, Transactional,
};

use crate::constants::MAX_LABEL_CHARS;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// One recorded analysis: a video or image whose per-frame results are kept
/// in `session_results` under the session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureSession {
    pub id: String,
    pub posture_type: PostureType,
    /// `None` for a still-image session.
    pub fps: Option<f64>,
    pub label: Option<String>,
    pub result_count: u64,
    /// Highest frame index any append has seen, stored or not. Frames sent
    /// without an index are numbered after it.
    #[serde(default)]
    pub last_frame_index: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostureSession {
    pub fn new(posture_type: PostureType, fps: Option<f64>, label: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            posture_type,
            fps,
            label: label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            result_count: 0,
            last_frame_index: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        if let Some(fps) = self.fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(StoreError::Validation(format!(
                    "fps must be a positive number, got {fps}"
                )));
            }
        }
        if let Some(label) = &self.label {
            if label.chars().count() > MAX_LABEL_CHARS {
                return Err(StoreError::Validation(format!(
                    "label must be at most {MAX_LABEL_CHARS} characters"
                )));
            }
        }
        Ok(())
    }
}

fn session_not_found(session_id: &str) -> StoreError {
    StoreError::NotFound {
        entity: "session".to_string(),
        key: session_id.to_string(),
    }
}

impl Store {
    pub fn create_session(&self, session: &PostureSession) -> Result<(), StoreError> {
        session.validate()?;

        let key = keys::session_key(&session.id);
        let index_key =
            keys::session_created_index_key(session.created_at.timestamp_millis(), &session.id);
        let session_bytes = Self::serialize(session)?;

        (&self.sessions, &self.sessions_by_created_at).transaction(
            |(tx_sessions, tx_index)| -> ConflictableTransactionResult<(), StoreError> {
                tx_sessions.insert(key.as_bytes(), session_bytes.as_slice())?;
                tx_index.insert(index_key.as_bytes(), session.id.as_bytes())?;
                Ok(())
            },
        )?;

        tracing::debug!(
            session_id = %session.id,
            posture_type = %session.posture_type,
            "Session created"
        );
        Ok(())
    }

    pub fn get_session(&self, session_id: &str) -> Result<Option<PostureSession>, StoreError> {
        let key = keys::session_key(session_id);
        match self.sessions.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn require_session(&self, session_id: &str) -> Result<PostureSession, StoreError> {
        self.get_session(session_id)?
            .ok_or_else(|| session_not_found(session_id))
    }

    /// Sessions newest first.
    pub fn list_sessions(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PostureSession>, StoreError> {
        let mut sessions = Vec::with_capacity(limit.min(64));
        for item in self.sessions_by_created_at.iter().skip(offset) {
            if sessions.len() >= limit {
                break;
            }
            let (_, id) = item?;
            let id = String::from_utf8_lossy(&id);
            // Index entries can briefly outlive a concurrently deleted session.
            if let Some(session) = self.get_session(&id)? {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    pub fn count_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Store the report's results under their frame indices and bump the
    /// session's counters in one transaction. A frame index that already has
    /// a result is overwritten, not duplicated.
    pub fn append_results(
        &self,
        session_id: &str,
        report: &BatchReport,
    ) -> Result<PostureSession, StoreError> {
        let entries = report
            .indexed_results()
            .map(|(frame_index, result)| {
                Ok((
                    keys::session_result_key(session_id, frame_index),
                    Self::serialize(result)?,
                ))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        let batch_last = report.last_frame_index();
        let key = keys::session_key(session_id);

        let session = (&self.sessions, &self.session_results).transaction(
            |(tx_sessions, tx_results)| {
                let Some(raw) = tx_sessions.get(key.as_bytes())? else {
                    return abort(session_not_found(session_id));
                };
                let mut session: PostureSession =
                    Self::deserialize(&raw).map_err(ConflictableTransactionError::Abort)?;

                let mut added = 0_u64;
                for (result_key, bytes) in &entries {
                    if tx_results
                        .insert(result_key.as_bytes(), bytes.as_slice())?
                        .is_none()
                    {
                        added += 1;
                    }
                }

                session.result_count += added;
                session.last_frame_index = session.last_frame_index.max(batch_last);
                session.updated_at = Utc::now();
                let bytes =
                    Self::serialize(&session).map_err(ConflictableTransactionError::Abort)?;
                tx_sessions.insert(key.as_bytes(), bytes)?;
                Ok(session)
            },
        )?;

        tracing::debug!(
            session_id,
            appended = entries.len(),
            total = session.result_count,
            "Results appended"
        );
        Ok(session)
    }

    /// The session's results in frame order, paired with their frame index.
    pub fn get_results(
        &self,
        session_id: &str,
    ) -> Result<Vec<(u64, EvaluationResult)>, StoreError> {
        let prefix = keys::session_result_prefix(session_id);
        let mut results = Vec::new();
        for item in self.session_results.scan_prefix(prefix.as_bytes()) {
            let (k, v) = item?;
            let Some(frame_index) = keys::frame_index_from_result_key(&k) else {
                tracing::warn!(session_id, "Skipping result with malformed key");
                continue;
            };
            results.push((frame_index, Self::deserialize(&v)?));
        }
        Ok(results)
    }

    pub fn delete_session(&self, session_id: &str) -> Result<PostureSession, StoreError> {
        let key = keys::session_key(session_id);

        let session = (&self.sessions, &self.sessions_by_created_at).transaction(
            |(tx_sessions, tx_index)| {
                let Some(raw) = tx_sessions.remove(key.as_bytes())? else {
                    return abort(session_not_found(session_id));
                };
                let session: PostureSession =
                    Self::deserialize(&raw).map_err(ConflictableTransactionError::Abort)?;
                let index_key = keys::session_created_index_key(
                    session.created_at.timestamp_millis(),
                    &session.id,
                );
                tx_index.remove(index_key.as_bytes())?;
                Ok(session)
            },
        )?;

        // Appends check the session record inside their transaction, so none
        // can land after it is gone.
        let prefix = keys::session_result_prefix(session_id);
        let mut batch = sled::Batch::default();
        let mut removed = 0_u64;
        for item in self.session_results.scan_prefix(prefix.as_bytes()) {
            let (k, _) = item?;
            batch.remove(k);
            removed += 1;
        }
        self.session_results.apply_batch(batch)?;

        tracing::debug!(session_id, removed, "Session deleted");
        Ok(session)
    }
}

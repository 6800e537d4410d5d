use crate::store::operations::posture_sessions::PostureSession;
use crate::store::{keys, Store, StoreError};

pub(crate) const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_session_created_index", m002_session_created_index),
    ]
}

/// Apply every migration newer than the stored version, in order.
///
/// Migrations must be idempotent: a crash between a migration and its
/// version bump reruns it on the next start. The version only moves forward.
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;

    for (index, (name, func)) in migrations().iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.config_versions.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            let bytes: [u8; 4] = raw.as_ref().try_into().map_err(|_| StoreError::Migration {
                version: 0,
                message: format!("corrupt version marker ({} bytes)", raw.len()),
            })?;
            Ok(u32::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .config_versions
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

fn m002_session_created_index(store: &Store) -> Result<(), StoreError> {
    for item in store.sessions.iter() {
        let (_, value) = item?;
        let session: PostureSession = Store::deserialize(&value)?;
        let index_key =
            keys::session_created_index_key(session.created_at.timestamp_millis(), &session.id);
        store
            .sessions_by_created_at
            .insert(index_key.as_bytes(), session.id.as_bytes())?;
    }
    Ok(())
}

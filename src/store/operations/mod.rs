pub mod posture_sessions;

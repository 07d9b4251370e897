/// Record ids are assigned by the remote store and treated as opaque.
pub type TargetId = String;

/// User ids come from the auth provider and are treated as opaque.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

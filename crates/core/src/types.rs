/// Record primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// User identifiers are issued by the identity service as UUIDs.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

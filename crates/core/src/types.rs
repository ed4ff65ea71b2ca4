/// All primary keys are UUIDv7, generated by the service so that every store
/// implementation agrees on identity and ordering.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a new time-ordered primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}

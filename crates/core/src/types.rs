/// Primary keys are UUIDs (v7 for rows created by the service, so they sort
/// roughly by creation time).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a new time-ordered row id.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}

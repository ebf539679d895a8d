/// All primary keys are UUIDv7: globally unique and time-ordered, so
/// `ORDER BY created_at, id` gives a stable pagination order.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}

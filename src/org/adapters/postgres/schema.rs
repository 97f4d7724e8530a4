//! Diesel schema for user persistence.

diesel::table! {
    /// User records forming the manager/report graph.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Role literal (`admin`, `manager`, `member`).
        #[max_length = 50]
        role -> Varchar,
        /// Optional manager reference.
        manager_id -> Nullable<Uuid>,
    }
}

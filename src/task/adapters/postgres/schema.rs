//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with lifecycle and decision bookkeeping.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Lifecycle status literal.
        #[max_length = 50]
        status -> Varchar,
        /// Completion percentage (0–100).
        progress -> SmallInt,
        /// Creating user.
        created_by -> Uuid,
        /// Optional assignee.
        assigned_to -> Nullable<Uuid>,
        /// Optional completion deadline.
        deadline -> Nullable<Timestamptz>,
        /// Completion timestamp, set on entering pending approval.
        completed_at -> Nullable<Timestamptz>,
        /// Whether an approval has locked the status.
        completion_locked -> Bool,
        /// When the task entered pending approval.
        pending_approval_notified_at -> Nullable<Timestamptz>,
        /// Approving user, if approved.
        approved_by -> Nullable<Uuid>,
        /// Approval timestamp, if approved.
        approved_at -> Nullable<Timestamptz>,
        /// Rejecting user, if rejected.
        rejected_by -> Nullable<Uuid>,
        /// Rejection timestamp, if rejected.
        rejected_at -> Nullable<Timestamptz>,
        /// Rejection reason, if rejected.
        rejection_reason -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only approval decision records.
    task_audits (id) {
        /// Audit identifier.
        id -> Uuid,
        /// Task the decision applied to.
        task_id -> Uuid,
        /// Decision literal (`approved`, `rejected`).
        #[max_length = 50]
        action -> Varchar,
        /// Deciding user.
        actor_id -> Uuid,
        /// Free-text decision comments.
        comments -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

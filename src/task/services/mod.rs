//! Application services for the task lifecycle.

mod access;
mod assignment;
mod lifecycle;

pub use access::AccessPolicy;
pub use assignment::{AssignmentError, AssignmentPolicy};
pub use lifecycle::{
    ApproveTaskRequest, CreateTaskRequest, PolicyDenial, RejectTaskRequest, TaskLifecycleService,
    TaskServiceError, TaskServiceResult,
};

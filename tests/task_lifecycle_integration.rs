//! Behavioural integration tests for the task lifecycle core.
//!
//! These tests exercise the public service API end to end over the
//! in-memory adapters: creation, the guarded update pipeline, approval
//! and rejection decisions with their audit records, and hierarchy-driven
//! visibility.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::cognitive_complexity,
    reason = "Test functions may have higher complexity for full scenario coverage"
)]

use std::sync::Arc;

use foreman::org::{
    adapters::memory::InMemoryUserDirectory,
    domain::{Actor, Role, User, UserId},
    services::{HierarchyResolver, RosterService, UserUpdate},
};
use foreman::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{AuditAction, TaskChanges, TaskStatus},
    services::{
        ApproveTaskRequest, CreateTaskRequest, RejectTaskRequest, TaskLifecycleService,
        TaskServiceError,
    },
};
use mockable::DefaultClock;
use tokio::runtime::Runtime;

type TestService = TaskLifecycleService<InMemoryUserDirectory, InMemoryTaskRepository, DefaultClock>;

/// Creates a tokio runtime for async operations in tests.
fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

struct Org {
    directory: Arc<InMemoryUserDirectory>,
    service: TestService,
    admin: Actor,
    manager: Actor,
    member: Actor,
}

fn seed_org() -> Org {
    let directory = Arc::new(InMemoryUserDirectory::new());
    let service = TaskLifecycleService::new(
        Arc::clone(&directory),
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    );

    let seed = |role: Role, manager: Option<UserId>| -> Actor {
        let id = UserId::new();
        let user = User::new(id, role, manager).expect("seed user is valid");
        directory.insert(user).expect("seed user inserts");
        Actor::new(id, role)
    };

    let admin = seed(Role::Admin, None);
    let manager = seed(Role::Manager, None);
    let member = seed(Role::Member, Some(manager.id));

    Org {
        directory,
        service,
        admin,
        manager,
        member,
    }
}

/// Walks the happy path from creation through approval and verifies the
/// terminal lock.
#[test]
fn full_lifecycle_from_creation_to_approval() {
    let rt = test_runtime();
    let org = seed_org();

    // Admin creates a task for the member; an assignee means `assigned`.
    let task = rt
        .block_on(org.service.create_task(
            org.admin,
            CreateTaskRequest::new("Quarterly close")
                .with_description("Close the books for Q3")
                .with_assignee(org.member.id),
        ))
        .expect("task creation succeeds");
    assert_eq!(task.status(), TaskStatus::Assigned);
    assert_eq!(task.progress().value(), 0);

    // The member starts the work.
    let started = rt
        .block_on(org.service.update_task(
            org.member,
            task.id(),
            &TaskChanges::new().with_status("in_progress"),
        ))
        .expect("member starts the task");
    assert_eq!(started.status(), TaskStatus::InProgress);

    // Finishing at less than full progress is refused.
    let premature = rt.block_on(org.service.update_task(
        org.member,
        task.id(),
        &TaskChanges::new().with_progress(99).with_status("pending_approval"),
    ));
    assert!(matches!(premature, Err(TaskServiceError::Validation(_))));

    // Full progress and completion request in one patch.
    let pending = rt
        .block_on(org.service.update_task(
            org.member,
            task.id(),
            &TaskChanges::new()
                .with_progress(100)
                .with_status("pending_approval"),
        ))
        .expect("member completes the task");
    assert_eq!(pending.status(), TaskStatus::PendingApproval);
    assert!(pending.completed_at().is_some());

    // Admin approves; the decision and its audit land together.
    let approved = rt
        .block_on(org.service.approve_task(
            org.admin,
            ApproveTaskRequest::new(task.id()).with_comments("Verified against the ledger"),
        ))
        .expect("admin approves the task");
    assert_eq!(approved.status(), TaskStatus::Approved);
    assert!(approved.completion_locked());
    assert_eq!(approved.approved_by(), Some(org.admin.id));

    let trail = rt
        .block_on(org.service.audit_trail(org.admin, task.id()))
        .expect("audit trail loads");
    assert_eq!(trail.len(), 1);
    assert_eq!(
        trail.first().map(foreman::task::domain::TaskAudit::action),
        Some(AuditAction::Approved)
    );

    // The approval is terminal.
    let frozen = rt.block_on(org.service.update_task(
        org.member,
        task.id(),
        &TaskChanges::new().with_status("in_progress"),
    ));
    assert!(matches!(frozen, Err(TaskServiceError::Locked(_))));
}

/// Rejects a pending task, retries it, and approves the second attempt;
/// each decision leaves exactly one audit record.
#[test]
fn reject_retry_and_approve_accumulates_audit_trail() {
    let rt = test_runtime();
    let org = seed_org();

    let task = rt
        .block_on(org.service.create_task(
            org.manager,
            CreateTaskRequest::new("Data migration").with_assignee(org.member.id),
        ))
        .expect("task creation succeeds");

    rt.block_on(org.service.update_task(
        org.member,
        task.id(),
        &TaskChanges::new().with_status("in_progress"),
    ))
    .expect("member starts the task");
    rt.block_on(org.service.update_task(
        org.member,
        task.id(),
        &TaskChanges::new()
            .with_progress(100)
            .with_status("pending_approval"),
    ))
    .expect("member completes the task");

    let rejected = rt
        .block_on(org.service.reject_task(
            org.manager,
            RejectTaskRequest::new(task.id(), "Missing tests"),
        ))
        .expect("manager rejects the task");
    assert_eq!(rejected.status(), TaskStatus::Rejected);
    assert_eq!(rejected.rejection_reason(), Some("Missing tests"));

    // Retry clears the rejection bookkeeping.
    let retried = rt
        .block_on(org.service.update_task(
            org.member,
            task.id(),
            &TaskChanges::new().with_status("in_progress"),
        ))
        .expect("member retries the task");
    assert_eq!(retried.status(), TaskStatus::InProgress);
    assert!(retried.rejection_reason().is_none());
    assert!(retried.rejected_by().is_none());

    rt.block_on(org.service.update_task(
        org.member,
        task.id(),
        &TaskChanges::new().with_status("pending_approval"),
    ))
    .expect("member completes the retry");

    let approved = rt
        .block_on(
            org.service
                .approve_task(org.manager, ApproveTaskRequest::new(task.id())),
        )
        .expect("manager approves the retry");
    assert_eq!(approved.status(), TaskStatus::Approved);
    assert!(approved.rejected_by().is_none());

    let trail = rt
        .block_on(org.service.audit_trail(org.manager, task.id()))
        .expect("audit trail loads");
    let actions: Vec<AuditAction> = trail.iter().map(|entry| entry.action()).collect();
    assert_eq!(actions, vec![AuditAction::Rejected, AuditAction::Approved]);
}

/// Hierarchy edits change what a manager can see and decide.
#[test]
fn visibility_follows_hierarchy_edits() {
    let rt = test_runtime();
    let org = seed_org();
    let roster = RosterService::new(Arc::clone(&org.directory));
    let resolver = HierarchyResolver::new(Arc::clone(&org.directory));

    let task = rt
        .block_on(org.service.create_task(
            org.admin,
            CreateTaskRequest::new("Handover item").with_assignee(org.member.id),
        ))
        .expect("task creation succeeds");

    // The member reports to the manager, so the manager sees the task.
    assert!(
        rt.block_on(org.service.get_task(org.manager, task.id()))
            .is_ok()
    );
    let subordinates = rt
        .block_on(resolver.resolve_subordinates(org.manager.id))
        .expect("hierarchy resolves");
    assert!(subordinates.contains(&org.member.id));

    // Detach the member from the manager; visibility follows.
    rt.block_on(roster.update_user(
        org.admin,
        org.member.id,
        UserUpdate {
            role: None,
            manager: None,
        },
    ))
    .expect("roster update succeeds");

    let denied = rt.block_on(org.service.get_task(org.manager, task.id()));
    assert!(matches!(denied, Err(TaskServiceError::Forbidden(_))));

    // The assignee keeps access regardless of reporting lines.
    assert!(
        rt.block_on(org.service.get_task(org.member, task.id()))
            .is_ok()
    );
}

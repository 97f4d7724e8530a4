//! Then steps for task approval BDD scenarios.

use super::world::{TaskApprovalWorld, run_async, seeded};
use foreman::task::{
    domain::{AuditAction, TaskStatus},
    services::{PolicyDenial, TaskServiceError},
};
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.current_task()?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then("the task is completion locked")]
fn task_is_locked(world: &TaskApprovalWorld) -> Result<(), eyre::Report> {
    if !world.current_task()?.completion_locked() {
        return Err(eyre::eyre!("expected the task to be completion locked"));
    }
    Ok(())
}

#[then(r#"the stored rejection reason is "{reason}""#)]
fn stored_rejection_reason(world: &TaskApprovalWorld, reason: String) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.rejection_reason() != Some(reason.as_str()) {
        return Err(eyre::eyre!(
            "expected rejection reason {reason:?}, found {:?}",
            task.rejection_reason()
        ));
    }
    Ok(())
}

#[then(r#"the audit trail records one "{action}" decision"#)]
fn audit_trail_records(world: &TaskApprovalWorld, action: String) -> Result<(), eyre::Report> {
    let expected = AuditAction::try_from(action.as_str())
        .map_err(|err| eyre::eyre!("invalid expected action in scenario: {err}"))?;
    let admin = seeded(world.admin, "admin")?;
    let task_id = world.current_task()?.id();

    let trail = run_async(world.service.audit_trail(admin, task_id))?;
    if trail.len() != 1 {
        return Err(eyre::eyre!("expected one audit entry, found {}", trail.len()));
    }
    if !trail.iter().all(|entry| entry.action() == expected) {
        return Err(eyre::eyre!("audit entry does not record {expected}"));
    }
    Ok(())
}

#[then("the decision is refused for missing decision rights")]
fn decision_refused(world: &TaskApprovalWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_decision
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing decision result"))?;

    if !matches!(
        result,
        Err(TaskServiceError::Forbidden(PolicyDenial::DecisionRights))
    ) {
        return Err(eyre::eyre!("expected decision-rights refusal, got {result:?}"));
    }
    Ok(())
}

#[then("the update is refused because the task is locked")]
fn update_refused_locked(world: &TaskApprovalWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;

    if !matches!(result, Err(TaskServiceError::Locked(_))) {
        return Err(eyre::eyre!("expected locked refusal, got {result:?}"));
    }
    Ok(())
}

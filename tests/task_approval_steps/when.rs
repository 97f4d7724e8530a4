//! When steps for task approval BDD scenarios.

use super::world::{TaskApprovalWorld, run_async, seeded};
use foreman::task::{
    domain::TaskChanges,
    services::{ApproveTaskRequest, RejectTaskRequest},
};
use rstest_bdd_macros::when;

#[when(r#"the admin approves the task with comments "{comments}""#)]
fn admin_approves(world: &mut TaskApprovalWorld, comments: String) -> Result<(), eyre::Report> {
    let admin = seeded(world.admin, "admin")?;
    let task_id = world.current_task()?.id();

    let result = run_async(
        world
            .service
            .approve_task(admin, ApproveTaskRequest::new(task_id).with_comments(comments)),
    );
    if let Ok(ref approved) = result {
        world.task = Some(approved.clone());
    }
    world.last_decision = Some(result);
    Ok(())
}

#[when(r#"the manager rejects the task with reason "{reason}""#)]
fn manager_rejects(world: &mut TaskApprovalWorld, reason: String) -> Result<(), eyre::Report> {
    let manager = seeded(world.manager, "manager")?;
    let task_id = world.current_task()?.id();

    let result = run_async(
        world
            .service
            .reject_task(manager, RejectTaskRequest::new(task_id, reason)),
    );
    if let Ok(ref rejected) = result {
        world.task = Some(rejected.clone());
    }
    world.last_decision = Some(result);
    Ok(())
}

#[when("the member attempts to approve the task")]
fn member_attempts_approval(world: &mut TaskApprovalWorld) -> Result<(), eyre::Report> {
    let member = seeded(world.member, "member")?;
    let task_id = world.current_task()?.id();

    let result = run_async(
        world
            .service
            .approve_task(member, ApproveTaskRequest::new(task_id)),
    );
    world.last_decision = Some(result);
    Ok(())
}

#[when(r#"the member attempts to move the task to "{status}""#)]
fn member_attempts_update(world: &mut TaskApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let member = seeded(world.member, "member")?;
    let task_id = world.current_task()?.id();

    let result = run_async(world.service.update_task(
        member,
        task_id,
        &TaskChanges::new().with_status(status),
    ));
    world.last_update = Some(result);
    Ok(())
}

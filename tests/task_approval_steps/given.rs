//! Given steps for task approval BDD scenarios.

use super::world::{TaskApprovalWorld, run_async, seeded};
use eyre::WrapErr;
use foreman::org::domain::{Actor, Role, User, UserId};
use foreman::task::{
    domain::TaskChanges,
    services::{ApproveTaskRequest, CreateTaskRequest},
};
use rstest_bdd_macros::given;

fn seed_actor(
    world: &TaskApprovalWorld,
    role: Role,
    manager: Option<UserId>,
) -> Result<Actor, eyre::Report> {
    let id = UserId::new();
    world
        .directory
        .insert(User::new(id, role, manager).wrap_err("construct seed user")?)
        .wrap_err("insert seed user")?;
    Ok(Actor::new(id, role))
}

#[given("an organization with an admin, a manager, and a member reporting to the manager")]
fn organization(world: &mut TaskApprovalWorld) -> Result<(), eyre::Report> {
    let admin = seed_actor(world, Role::Admin, None)?;
    let manager = seed_actor(world, Role::Manager, None)?;
    let member = seed_actor(world, Role::Member, Some(manager.id))?;

    world.admin = Some(admin);
    world.manager = Some(manager);
    world.member = Some(member);
    Ok(())
}

#[given("a task created by the admin and assigned to the member")]
fn task_created(world: &mut TaskApprovalWorld) -> Result<(), eyre::Report> {
    let admin = seeded(world.admin, "admin")?;
    let member = seeded(world.member, "member")?;

    let task = run_async(world.service.create_task(
        admin,
        CreateTaskRequest::new("Ship the release")
            .with_description("Cut, test, and publish the release")
            .with_assignee(member.id),
    ))
    .wrap_err("create task in scenario setup")?;

    world.task = Some(task);
    Ok(())
}

#[given("the member has driven the task to pending approval")]
fn task_pending(world: &mut TaskApprovalWorld) -> Result<(), eyre::Report> {
    let member = seeded(world.member, "member")?;
    let task_id = world.current_task()?.id();

    run_async(world.service.update_task(
        member,
        task_id,
        &TaskChanges::new().with_status("in_progress"),
    ))
    .wrap_err("start task in scenario setup")?;

    let pending = run_async(world.service.update_task(
        member,
        task_id,
        &TaskChanges::new()
            .with_progress(100)
            .with_status("pending_approval"),
    ))
    .wrap_err("complete task in scenario setup")?;

    world.task = Some(pending);
    Ok(())
}

#[given("the admin has approved the task")]
fn task_approved(world: &mut TaskApprovalWorld) -> Result<(), eyre::Report> {
    let admin = seeded(world.admin, "admin")?;
    let task_id = world.current_task()?.id();

    let approved = run_async(
        world
            .service
            .approve_task(admin, ApproveTaskRequest::new(task_id)),
    )
    .wrap_err("approve task in scenario setup")?;

    world.task = Some(approved);
    Ok(())
}

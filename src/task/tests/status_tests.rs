//! Unit tests for the status transition table.

use crate::task::domain::TaskStatus;
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[case(TaskStatus::Created, TaskStatus::Created, true)]
#[case(TaskStatus::Created, TaskStatus::Assigned, true)]
#[case(TaskStatus::Created, TaskStatus::InProgress, false)]
#[case(TaskStatus::Created, TaskStatus::PendingApproval, false)]
#[case(TaskStatus::Created, TaskStatus::Approved, false)]
#[case(TaskStatus::Created, TaskStatus::Rejected, false)]
#[case(TaskStatus::Assigned, TaskStatus::Created, false)]
#[case(TaskStatus::Assigned, TaskStatus::Assigned, true)]
#[case(TaskStatus::Assigned, TaskStatus::InProgress, true)]
#[case(TaskStatus::Assigned, TaskStatus::PendingApproval, false)]
#[case(TaskStatus::Assigned, TaskStatus::Approved, false)]
#[case(TaskStatus::Assigned, TaskStatus::Rejected, false)]
#[case(TaskStatus::InProgress, TaskStatus::Created, false)]
#[case(TaskStatus::InProgress, TaskStatus::Assigned, false)]
#[case(TaskStatus::InProgress, TaskStatus::InProgress, true)]
#[case(TaskStatus::InProgress, TaskStatus::PendingApproval, true)]
#[case(TaskStatus::InProgress, TaskStatus::Approved, false)]
#[case(TaskStatus::InProgress, TaskStatus::Rejected, false)]
#[case(TaskStatus::PendingApproval, TaskStatus::Created, false)]
#[case(TaskStatus::PendingApproval, TaskStatus::Assigned, false)]
#[case(TaskStatus::PendingApproval, TaskStatus::InProgress, false)]
#[case(TaskStatus::PendingApproval, TaskStatus::PendingApproval, true)]
#[case(TaskStatus::PendingApproval, TaskStatus::Approved, true)]
#[case(TaskStatus::PendingApproval, TaskStatus::Rejected, true)]
#[case(TaskStatus::Approved, TaskStatus::Created, false)]
#[case(TaskStatus::Approved, TaskStatus::Assigned, false)]
#[case(TaskStatus::Approved, TaskStatus::InProgress, false)]
#[case(TaskStatus::Approved, TaskStatus::PendingApproval, false)]
#[case(TaskStatus::Approved, TaskStatus::Approved, true)]
#[case(TaskStatus::Approved, TaskStatus::Rejected, false)]
#[case(TaskStatus::Rejected, TaskStatus::Created, false)]
#[case(TaskStatus::Rejected, TaskStatus::Assigned, false)]
#[case(TaskStatus::Rejected, TaskStatus::InProgress, true)]
#[case(TaskStatus::Rejected, TaskStatus::PendingApproval, false)]
#[case(TaskStatus::Rejected, TaskStatus::Approved, false)]
#[case(TaskStatus::Rejected, TaskStatus::Rejected, true)]
fn can_transition_to_returns_expected(
    #[case] from: TaskStatus,
    #[case] to: TaskStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(TaskStatus::Created, false)]
#[case(TaskStatus::Assigned, false)]
#[case(TaskStatus::InProgress, false)]
#[case(TaskStatus::PendingApproval, false)]
#[case(TaskStatus::Approved, true)]
#[case(TaskStatus::Rejected, false)]
fn is_terminal_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.is_terminal(), expected);
}

#[rstest]
#[case(TaskStatus::Approved, true)]
#[case(TaskStatus::Rejected, true)]
#[case(TaskStatus::PendingApproval, false)]
#[case(TaskStatus::InProgress, false)]
fn is_decision_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.is_decision(), expected);
}

#[rstest]
#[case("created", TaskStatus::Created)]
#[case("assigned", TaskStatus::Assigned)]
#[case("in_progress", TaskStatus::InProgress)]
#[case("pending_approval", TaskStatus::PendingApproval)]
#[case("approved", TaskStatus::Approved)]
#[case("rejected", TaskStatus::Rejected)]
#[case("completed", TaskStatus::PendingApproval)]
#[case(" Completed ", TaskStatus::PendingApproval)]
fn from_request_normalizes_literals(#[case] literal: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::from_request(literal), Ok(expected));
}

#[rstest]
#[case("done")]
#[case("cancelled")]
#[case("")]
fn from_request_rejects_unknown_literals(#[case] literal: &str) {
    assert!(TaskStatus::from_request(literal).is_err());
}

#[rstest]
fn status_round_trips_through_wire_literals() -> eyre::Result<()> {
    ensure!(serde_json::to_string(&TaskStatus::PendingApproval)? == r#""pending_approval""#);
    ensure!(serde_json::from_str::<TaskStatus>(r#""in_progress""#)? == TaskStatus::InProgress);
    Ok(())
}

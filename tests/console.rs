//! Integration tests for the console: tally refresh after a recorded outcome.

mod common;

use common::{two_v_two, FakeGateway};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use team_balancer_web::{
    spawn_submission, Console, CredentialStore, MemoryCredentialStore, OutcomeConfig, OutcomeError,
    OutcomeState, SharedConsole, Side, SubmissionError, Teams, TierThresholds,
};

fn console() -> Console<MemoryCredentialStore> {
    Console::new(MemoryCredentialStore::new(), OutcomeConfig::default(), TierThresholds::CURRENT)
}

/// Teams shown, cached credential, team A declared: a submission is waiting to be sent.
fn pending_console() -> SharedConsole<MemoryCredentialStore> {
    let mut c = console();
    c.controller_mut().store_mut().set("admin:pw", 30).unwrap();
    c.show_teams(two_v_two()).unwrap();
    c.controller_mut().select_team(Side::A).unwrap();
    Arc::new(Mutex::new(c))
}

#[tokio::test]
async fn recorded_outcome_updates_tally_and_clears_teams() {
    let gateway = FakeGateway::ok();
    let mut c = console();
    c.show_teams(two_v_two()).unwrap();
    assert_eq!(c.roster().len(), 4);

    c.controller_mut().select_team(Side::B).unwrap();
    c.controller_mut().provide_credential("admin:pw").unwrap();
    let recorded = c.submit_pending(&gateway).await.unwrap();
    assert_eq!(recorded.winner, Side::B);

    for p in c.roster() {
        match p.nickname.as_str() {
            "Cy" | "Dee" => assert_eq!((p.wins, p.losses), (1, 0), "{}", p.nickname),
            _ => assert_eq!((p.wins, p.losses), (0, 1), "{}", p.nickname),
        }
    }
    assert!(c.teams().is_empty());
    assert_eq!(c.fairness(), None);
    assert_eq!(*c.controller().state(), OutcomeState::Success);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn failed_submission_leaves_tally_alone() {
    let gateway = FakeGateway::failing(SubmissionError::Transport("connection refused".into()));
    let mut c = console();
    c.controller_mut().store_mut().set("admin:pw", 30).unwrap();
    c.show_teams(two_v_two()).unwrap();
    c.controller_mut().select_team(Side::A).unwrap();
    assert!(c.submit_pending(&gateway).await.is_none());

    assert!(c.roster().iter().all(|p| p.wins == 0 && p.losses == 0));
    assert_eq!(c.teams(), &two_v_two());
    let view = c.snapshot().outcome;
    assert_eq!(view.state, "error");
    assert_eq!(view.banner.unwrap().message, "connection refused");
}

#[test]
fn showing_teams_again_does_not_duplicate_roster() {
    let mut c = console();
    c.show_teams(two_v_two()).unwrap();
    c.show_teams(two_v_two()).unwrap();
    assert_eq!(c.roster().len(), 4);
}

#[test]
fn teams_locked_while_submitting() {
    let mut c = console();
    c.controller_mut().store_mut().set("admin:pw", 30).unwrap();
    c.show_teams(two_v_two()).unwrap();
    c.controller_mut().select_team(Side::A).unwrap();
    assert_eq!(c.show_teams(Teams::default()), Err(OutcomeError::Busy));
}

#[test]
fn snapshot_reports_fairness_and_nations() {
    let mut c = console();
    c.show_teams(two_v_two()).unwrap();
    let snap = c.snapshot();
    let fairness = snap.fairness.unwrap();
    assert_eq!(fairness.score_a, 6.0);
    assert_eq!(fairness.score_b, 6.0);
    assert_eq!(fairness.percentage, 100.0);

    let nations = c.nations(&mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(nations.pairings.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn result_lands_after_the_request_is_dropped() {
    let shared = pending_console();
    let gateway = Arc::new(FakeGateway::ok().with_delay(Duration::from_secs(5)));

    // the caller gives up long before the service answers
    let request = async {
        let handle = spawn_submission(shared.clone(), gateway.clone()).unwrap();
        handle.await
    };
    assert!(tokio::time::timeout(Duration::from_secs(1), request).await.is_err());
    assert!(shared.lock().unwrap().controller().is_submitting());

    tokio::time::sleep(Duration::from_secs(5)).await;
    let c = shared.lock().unwrap();
    assert_eq!(*c.controller().state(), OutcomeState::Success);
    assert!(c.teams().is_empty());
    assert_eq!(c.roster().iter().filter(|p| p.wins == 1).count(), 2);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn one_task_per_outcome() {
    let shared = pending_console();
    let gateway = Arc::new(FakeGateway::ok());

    let handle = spawn_submission(shared.clone(), gateway.clone()).unwrap();
    assert!(spawn_submission(shared.clone(), gateway.clone()).is_none());
    let recorded = handle.await.unwrap().unwrap();
    assert_eq!(recorded.winner, Side::A);
    assert!(spawn_submission(shared.clone(), gateway.clone()).is_none());
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn console_is_usable_after_a_detached_failure() {
    let shared = pending_console();
    let gateway = Arc::new(FakeGateway::failing(SubmissionError::Transport("timed out".into())));

    let handle = spawn_submission(shared.clone(), gateway.clone()).unwrap();
    assert!(handle.await.unwrap().is_none());

    let mut c = shared.lock().unwrap();
    assert_eq!(c.snapshot().outcome.state, "error");
    c.controller_mut().retry().unwrap();
    assert!(c.controller().is_submitting());
}

//! End-to-end races driven on Tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use status_dispatcher::ApplicationStatusResponse;

mod common;
use common::{approve, dispatcher, fail, retry, scripted, PanickingService};

const DEADLINE: Duration = Duration::from_secs(15);

#[tokio::test(start_paused = true)]
async fn test_retrying_branch_beats_failed_branch() {
    let s1 = scripted("s1", vec![retry(50), approve("APPROVED")]);
    let s2 = scripted("s2", vec![fail("backend down")]);
    let dispatcher = dispatcher(s1.clone(), s2.clone(), DEADLINE);

    let start = Instant::now();
    let response = dispatcher.dispatch("A1").await;

    assert_eq!(
        response,
        ApplicationStatusResponse::Success {
            id: "A1".into(),
            status: "APPROVED".into()
        }
    );
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50), "returned too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(1), "returned too late: {:?}", elapsed);
    assert_eq!(s1.calls(), 2);
    assert_eq!(s2.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_when_both_keep_retrying() {
    let s1 = scripted("s1", vec![retry(20_000)]);
    let s2 = scripted("s2", vec![retry(20_000)]);
    let dispatcher = dispatcher(s1, s2, DEADLINE);

    let start = Instant::now();
    let response = dispatcher.dispatch("A1").await;

    assert_eq!(response, ApplicationStatusResponse::timed_out());
    let elapsed = start.elapsed();
    assert!(elapsed >= DEADLINE, "returned before the deadline: {:?}", elapsed);
    assert!(elapsed < DEADLINE + Duration::from_millis(100), "returned after the deadline: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_first_success_wins() {
    let fast = scripted("fast", vec![retry(100), approve("FAST")]);
    let slow = scripted("slow", vec![retry(3_000), approve("SLOW")]);
    let dispatcher = dispatcher(slow, fast, DEADLINE);

    let start = Instant::now();
    let response = dispatcher.dispatch("A7").await;

    assert_eq!(
        response,
        ApplicationStatusResponse::Success {
            id: "A7".into(),
            status: "FAST".into()
        }
    );
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_retry_loop_calls_n_plus_one_times() {
    const RETRIES: usize = 3;
    let mut steps = vec![retry(100); RETRIES];
    steps.push(approve("APPROVED"));
    let s1 = scripted("s1", steps);
    let s2 = scripted("s2", vec![retry(20_000)]);
    let dispatcher = dispatcher(s1.clone(), s2, DEADLINE);

    let response = dispatcher.dispatch("A1").await;

    assert!(response.is_success());
    assert_eq!(s1.calls() as usize, RETRIES + 1);
}

#[tokio::test(start_paused = true)]
async fn test_both_failed_reports_branch_failure() {
    let s1 = scripted("s1", vec![retry(10), retry(10), fail("rejected")]);
    let s2 = scripted("s2", vec![retry(500), fail("rejected")]);
    let dispatcher = dispatcher(s1, s2, DEADLINE);

    let start = Instant::now();
    let response = dispatcher.dispatch("A1").await;

    match response {
        ApplicationStatusResponse::Failure {
            last_request_time,
            retry_count,
        } => {
            assert!(last_request_time.is_some());
            assert_eq!(retry_count, 2);
        }
        other => panic!("expected branch failure, got {:?}", other),
    }
    // Waited for the second branch instead of failing fast.
    assert!(start.elapsed() >= Duration::from_millis(500));
    assert!(start.elapsed() < DEADLINE);
}

#[tokio::test(start_paused = true)]
async fn test_failure_does_not_preempt_success() {
    let s1 = scripted("s1", vec![fail("rejected")]);
    let s2 = scripted("s2", vec![retry(200), approve("IN_REVIEW")]);
    let dispatcher = dispatcher(s1, s2, DEADLINE);

    let response = dispatcher.dispatch("A2").await;

    assert_eq!(
        response,
        ApplicationStatusResponse::Success {
            id: "A2".into(),
            status: "IN_REVIEW".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_panicking_lookups_do_not_escape() {
    let dispatcher = dispatcher(Arc::new(PanickingService), Arc::new(PanickingService), DEADLINE);

    let start = Instant::now();
    let response = dispatcher.dispatch("A1").await;

    assert_eq!(response, ApplicationStatusResponse::timed_out());
    assert!(start.elapsed() < DEADLINE);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_lookup_does_not_block_healthy_branch() {
    let healthy = scripted("healthy", vec![retry(30), approve("APPROVED")]);
    let dispatcher = dispatcher(Arc::new(PanickingService), healthy, DEADLINE);

    let response = dispatcher.dispatch("A1").await;

    assert!(response.is_success());
}

#[tokio::test(start_paused = true)]
async fn test_losing_branch_stops_retrying() {
    let winner = scripted("winner", vec![approve("APPROVED")]);
    let loser = scripted("loser", vec![retry(100)]);
    let dispatcher = dispatcher(winner, loser.clone(), DEADLINE);

    let response = dispatcher.dispatch("A1").await;
    assert!(response.is_success());

    let calls_at_finish = loser.calls();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(loser.calls(), calls_at_finish);
}

#[tokio::test(start_paused = true)]
async fn test_branches_stop_after_deadline() {
    let s1 = scripted("s1", vec![retry(1_000)]);
    let s2 = scripted("s2", vec![retry(1_000)]);
    let dispatcher = dispatcher(s1.clone(), s2.clone(), Duration::from_millis(2_500));

    let response = dispatcher.dispatch("A1").await;
    assert_eq!(response, ApplicationStatusResponse::timed_out());

    let calls = (s1.calls(), s2.calls());
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!((s1.calls(), s2.calls()), calls);
}

#[tokio::test(start_paused = true)]
async fn test_dispatcher_is_reusable() {
    let s1 = scripted("s1", vec![approve("APPROVED")]);
    let s2 = scripted("s2", vec![approve("APPROVED")]);
    let dispatcher = dispatcher(s1, s2, DEADLINE);

    for id in ["A1", "A2", "A3"] {
        assert_eq!(
            dispatcher.dispatch(id).await,
            ApplicationStatusResponse::Success {
                id: id.into(),
                status: "APPROVED".into()
            }
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_deadline_reports_earlier_branch_failure() {
    let s1 = scripted("s1", vec![retry(10), fail("rejected")]);
    let s2 = scripted("s2", vec![retry(20_000)]);
    let dispatcher = dispatcher(s1, s2, DEADLINE);

    let start = Instant::now();
    let response = dispatcher.dispatch("A1").await;

    match response {
        ApplicationStatusResponse::Failure {
            last_request_time,
            retry_count,
        } => {
            assert!(last_request_time.is_some());
            assert_eq!(retry_count, 1);
        }
        other => panic!("expected branch failure, got {:?}", other),
    }
    // Still waited for the retrying branch until the deadline.
    assert!(start.elapsed() >= DEADLINE);
    assert!(start.elapsed() < DEADLINE + Duration::from_millis(100));
}

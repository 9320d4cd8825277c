//! Integration tests for reading scoring-service responses.

use team_balancer_web::gateway::interpret_response;
use team_balancer_web::{SubmissionError, SubmissionReceipt, Teams};

#[test]
fn success_body_is_parsed() {
    let r: SubmissionReceipt =
        interpret_response(200, r#"{"message":"Game results recorded successfully","eventIds":[4,5]}"#).unwrap();
    assert_eq!(r.event_ids, vec![4, 5]);
}

#[test]
fn error_field_wins_even_on_ok_status() {
    let err = interpret_response::<SubmissionReceipt>(200, r#"{"error":"Invalid admin passcode"}"#).unwrap_err();
    assert_eq!(err.to_string(), "Invalid admin passcode");
}

#[test]
fn server_message_preferred_over_status() {
    let err =
        interpret_response::<SubmissionReceipt>(400, r#"{"error":"Missing required field: teamA"}"#).unwrap_err();
    assert_eq!(
        err,
        SubmissionError::Server {
            status: Some(400),
            message: "Missing required field: teamA".into()
        }
    );
}

#[test]
fn bare_failure_status_gets_generic_message() {
    let err = interpret_response::<SubmissionReceipt>(502, "<html>bad gateway</html>").unwrap_err();
    assert_eq!(err.to_string(), "submission failed (HTTP 502)");
    let err = interpret_response::<SubmissionReceipt>(500, "{}").unwrap_err();
    assert_eq!(err.to_string(), "submission failed (HTTP 500)");
}

#[test]
fn unreadable_success_body_is_reported() {
    let err = interpret_response::<SubmissionReceipt>(200, "not json").unwrap_err();
    assert!(matches!(err, SubmissionError::Server { status: Some(200), .. }));
    assert!(err.to_string().starts_with("failed to process response"));
}

#[test]
fn balance_output_reads_into_teams() {
    let teams: Teams = interpret_response(
        200,
        r#"{"teamA":[{"id":1,"nickname":"Ann","score":3}],"teamB":[{"id":2,"nickname":"Bo","score":3}]}"#,
    )
    .unwrap();
    assert!(teams.both_filled());
    assert_eq!(teams.team_b[0].nickname, "Bo");
}

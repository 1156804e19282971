use std::cell::{Cell, RefCell};
use std::future::ready;

use super::*;
use crate::net::error::{ApiError, ErrorCode};

fn server_error(status: u16) -> ApiError {
    ApiError::new("upstream failed", status, ErrorCode::InternalError)
}

#[test]
fn delay_grows_linearly() {
    let policy = RetryPolicy::new(5, Duration::from_millis(250));
    assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(250));
    assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(500));
    assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(1000));
}

#[test]
fn default_policy_is_three_attempts_one_second() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay, Duration::from_secs(1));
}

#[tokio::test]
async fn fails_twice_then_succeeds_with_two_delays() {
    let calls = Cell::new(0);
    let delays = RefCell::new(Vec::new());

    let result = retry_request_with(
        RetryPolicy::new(3, Duration::from_millis(1000)),
        || {
            calls.set(calls.get() + 1);
            let outcome = if calls.get() <= 2 { Err(server_error(503)) } else { Ok("booked") };
            ready(outcome)
        },
        |wait| {
            delays.borrow_mut().push(wait);
            ready(())
        },
    )
    .await;

    assert_eq!(result, Ok("booked"));
    assert_eq!(calls.get(), 3);
    assert_eq!(*delays.borrow(), vec![Duration::from_millis(1000), Duration::from_millis(2000)]);
}

#[tokio::test]
async fn non_retryable_error_returns_immediately() {
    let calls = Cell::new(0);
    let slept = Cell::new(0);

    let result: Result<(), ApiError> = retry_request_with(
        RetryPolicy::default(),
        || {
            calls.set(calls.get() + 1);
            ready(Err(ApiError::new("missing", 404, ErrorCode::NotFound)))
        },
        |_| {
            slept.set(slept.get() + 1);
            ready(())
        },
    )
    .await;

    assert_eq!(result.unwrap_err().status(), 404);
    assert_eq!(calls.get(), 1);
    assert_eq!(slept.get(), 0);
}

#[tokio::test]
async fn escalating_status_stops_at_first_non_retryable() {
    let calls = Cell::new(0_u16);
    let slept = Cell::new(0);

    let result: Result<(), ApiError> = retry_request_with(
        RetryPolicy::new(3, Duration::from_millis(10)),
        || {
            calls.set(calls.get() + 1);
            ready(Err(server_error(500 + calls.get())))
        },
        |_| {
            slept.set(slept.get() + 1);
            ready(())
        },
    )
    .await;

    // 501 is not retryable, so the loop stops on the first attempt.
    assert_eq!(result.unwrap_err().status(), 501);
    assert_eq!(calls.get(), 1);
    assert_eq!(slept.get(), 0);
}

#[tokio::test]
async fn final_attempt_error_is_returned_without_extra_delay() {
    let calls = Cell::new(0);
    let delays = RefCell::new(Vec::new());

    let result: Result<(), ApiError> = retry_request_with(
        RetryPolicy::new(3, Duration::from_millis(100)),
        || {
            calls.set(calls.get() + 1);
            ready(Err(server_error(502)))
        },
        |wait| {
            delays.borrow_mut().push(wait);
            ready(())
        },
    )
    .await;

    assert_eq!(result.unwrap_err().status(), 502);
    assert_eq!(calls.get(), 3);
    assert_eq!(delays.borrow().len(), 2);
}

#[tokio::test]
async fn zero_attempts_still_runs_once() {
    let calls = Cell::new(0);
    let result: Result<u8, ApiError> = retry_request_with(
        RetryPolicy::new(0, Duration::from_millis(1)),
        || {
            calls.set(calls.get() + 1);
            ready(Err(server_error(500)))
        },
        |_| ready(()),
    )
    .await;
    assert!(result.is_err());
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn tokio_sleep_variant_succeeds() {
    let calls = Cell::new(0);
    let result = retry_request(RetryPolicy::new(2, Duration::from_millis(1)), || {
        calls.set(calls.get() + 1);
        let outcome = if calls.get() == 1 { Err(server_error(504)) } else { Ok(7) };
        ready(outcome)
    })
    .await;
    assert_eq!(result, Ok(7));
    assert_eq!(calls.get(), 2);
}

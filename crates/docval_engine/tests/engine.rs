use std::time::{Duration, Instant};

use bytes::Bytes;
use docval_engine::{
    parse_base_url, EngineEvent, EngineHandle, RawResponse, ServiceSettings,
    TransportFailureKind, UploadFile,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_doc() -> UploadFile {
    UploadFile::new("letter.doc", "application/msword", Bytes::from_static(b"doc"))
}

fn wait_for_settled(
    engine: &EngineHandle,
    timeout: Duration,
) -> Option<(u64, Result<RawResponse, docval_engine::TransportError>)> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(EngineEvent::Settled {
            submission_id,
            result,
        }) = engine.recv_timeout(Duration::from_millis(20)).unwrap()
        {
            return Some((submission_id, result));
        }
    }
    None
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_settles_submission_with_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let settings = ServiceSettings::new(parse_base_url(&server.uri()).unwrap());
    let engine = EngineHandle::new(settings).expect("engine starts");
    engine.submit(7, sample_doc());

    let (submission_id, result) = tokio::task::spawn_blocking(move || {
        wait_for_settled(&engine, Duration::from_secs(5)).expect("settled")
    })
    .await
    .unwrap();

    assert_eq!(submission_id, 7);
    let response = result.expect("response");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "[]");
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_settles_hanging_submission_as_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(10))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = ServiceSettings::new(parse_base_url(&server.uri()).unwrap());
    let engine = EngineHandle::new(settings).expect("engine starts");
    engine.submit(1, sample_doc());

    let (submission_id, result) = tokio::task::spawn_blocking(move || {
        // Still hanging: nothing settles on its own.
        assert!(wait_for_settled(&engine, Duration::from_millis(200)).is_none());
        engine.cancel(1);
        wait_for_settled(&engine, Duration::from_secs(5)).expect("settled")
    })
    .await
    .unwrap();

    assert_eq!(submission_id, 1);
    assert_eq!(result.unwrap_err().kind, TransportFailureKind::Cancelled);
}

#[test]
fn cancelling_unknown_submission_is_harmless() {
    let settings = ServiceSettings::new(parse_base_url("http://127.0.0.1:9").unwrap());
    let engine = EngineHandle::new(settings).expect("engine starts");
    engine.cancel(42);
    assert!(engine
        .recv_timeout(Duration::from_millis(200))
        .unwrap()
        .is_none());
}

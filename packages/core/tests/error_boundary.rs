use pretty_assertions::assert_eq;
use std::convert::Infallible;
use std::io;
use std::time::Duration;
use suspense_core::prelude::*;

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn catches_aborts_and_renders_the_message() {
    let boundary = ErrorBoundary::new();

    let frame = boundary
        .render(|| Err(io::Error::new(io::ErrorKind::AddrInUse, "asd").into()))
        .unwrap();

    assert_eq!(frame, "Error: asd");
    assert!(boundary.error().is_some());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn stays_tripped_once_an_error_is_caught() {
    let boundary = ErrorBoundary::new();

    boundary
        .render(|| Err(io::Error::new(io::ErrorKind::AddrInUse, "asd").into()))
        .unwrap();

    // The subtree is healthy again, but there is no reset path
    let frame = boundary.render(|| Ok("all good".to_string())).unwrap();
    assert_eq!(frame, "Error: asd");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn suspensions_pass_through_untouched() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let res = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, Infallible>(1)
    });
    let boundary = ErrorBoundary::new();

    // A pending read is control flow, not a failure
    let err = boundary.render(|| res.read().map(|v| v.to_string())).unwrap_err();
    assert!(matches!(err, RenderError::Suspended(_)));
    assert!(boundary.error().is_none());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn catches_failures_from_a_settled_resource() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let res = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Err::<String, _>(io::Error::new(io::ErrorKind::NotFound, "gone"))
    });
    let region = SuspenseBoundary::new("Loading...");
    let boundary = ErrorBoundary::new();

    let frame = boundary.render(|| region.render(|| res.read())).unwrap();
    assert_eq!(frame, "Loading...");

    rt.wait_for_work().await;
    rt.take_dirty();

    let frame = boundary.render(|| region.render(|| res.read())).unwrap();
    assert_eq!(frame, "Error: gone");
}

use pretty_assertions::assert_eq;
use std::convert::Infallible;
use std::time::Duration;
use suspense_core::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("went wrong")]
struct WentWrong;

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn boundary_renders_fallback_then_content() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let res = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, Infallible>("content".to_string())
    });
    let boundary = SuspenseBoundary::new("Loading value...");

    // While pending the boundary substitutes its fallback
    let frame = boundary.render(|| res.read()).unwrap();
    assert_eq!(frame, "Loading value...");

    // Settlement marks the boundary dirty for exactly one more attempt
    rt.wait_for_work().await;
    assert!(rt.take_dirty().contains(&boundary.id()));

    let frame = boundary.render(|| res.read()).unwrap();
    assert_eq!(frame, "content");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn repeated_pending_renders_attach_one_listener() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let res = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, Infallible>("content".to_string())
    });
    let boundary = SuspenseBoundary::new("Loading value...");

    // Several attempts against the same pending token
    for _ in 0..3 {
        assert_eq!(boundary.render(|| res.read()).unwrap(), "Loading value...");
    }

    rt.wait_for_work().await;
    rt.take_dirty();
    assert_eq!(boundary.render(|| res.read()).unwrap(), "content");

    // No second settle listener left behind: nothing else dirties the
    // boundary once the content has rendered
    rt.drive(res.settled()).await;
    assert!(!rt.has_dirty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn stale_settlement_is_a_harmless_rerender() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let slow_then_fast = |delay_ms: u64, value: &str| {
        let value = value.to_string();
        async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok::<_, Infallible>(value)
        }
    };

    let boundary = SuspenseBoundary::new("Loading value...");

    // The boundary first waits on a resource that is then superseded
    let superseded = Resource::new(slow_then_fast(10, "old"));
    assert_eq!(
        boundary.render(|| superseded.read()).unwrap(),
        "Loading value..."
    );

    let current = Resource::new(slow_then_fast(20, "new"));
    assert_eq!(
        boundary.render(|| current.read()).unwrap(),
        "Loading value..."
    );

    // The superseded operation settles first; the resulting render attempt
    // still shows the fallback because the current resource is pending
    rt.wait_for_work().await;
    rt.take_dirty();
    assert_eq!(superseded.state(), ResourceState::Ready);
    assert_eq!(
        boundary.render(|| current.read()).unwrap(),
        "Loading value..."
    );

    rt.wait_for_work().await;
    rt.take_dirty();
    assert_eq!(boundary.render(|| current.read()).unwrap(), "new");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn recycled_task_ids_do_not_defeat_the_listener() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let boundary = SuspenseBoundary::new("Loading value...");

    let first = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, Infallible>("first".to_string())
    });
    let first_task = first.task();
    assert_eq!(boundary.render(|| first.read()).unwrap(), "Loading value...");

    // Let the first operation settle: its completion task and the boundary's
    // settle listener both vacate their slots, freeing their ids for reuse
    rt.wait_for_work().await;
    rt.take_dirty();

    // The boundary has not re-rendered when the next operation arrives.
    // Occupy the listener's freed slot so the new completion task lands in
    // the first one's old slot and is handed the same id.
    spawn(async {});
    let second = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, Infallible>("second".to_string())
    });
    assert_eq!(second.task(), first_task);

    // Same id, different operation: the boundary must still attach a fresh
    // listener rather than treat the token as already handled
    assert_eq!(boundary.render(|| second.read()).unwrap(), "Loading value...");

    rt.wait_for_work().await;
    assert!(rt.take_dirty().contains(&boundary.id()));
    assert_eq!(boundary.render(|| second.read()).unwrap(), "second");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn aborts_propagate_past_the_boundary() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let res = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Err::<String, _>(WentWrong)
    });
    let boundary = SuspenseBoundary::new("Loading value...");

    assert_eq!(boundary.render(|| res.read()).unwrap(), "Loading value...");

    // A failed settlement still triggers the re-render attempt; interpreting
    // the failure is not the suspense boundary's job
    rt.wait_for_work().await;
    rt.take_dirty();

    let err = boundary.render(|| res.read()).unwrap_err();
    assert!(matches!(err, RenderError::Aborted(_)));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn independent_boundaries_do_not_interfere() {
    let rt = Runtime::new();
    let _guard = RuntimeGuard::new(rt.clone());

    let fast = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, Infallible>("fast".to_string())
    });
    let slow = Resource::new(async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok::<_, Infallible>("slow".to_string())
    });

    let fast_region = SuspenseBoundary::new("Loading fast...");
    let slow_region = SuspenseBoundary::new("Loading slow...");

    assert_eq!(fast_region.render(|| fast.read()).unwrap(), "Loading fast...");
    assert_eq!(slow_region.render(|| slow.read()).unwrap(), "Loading slow...");

    // The regions become ready at different times, each dirtying only itself
    rt.wait_for_work().await;
    let dirty = rt.take_dirty();
    assert!(dirty.contains(&fast_region.id()));
    assert!(!dirty.contains(&slow_region.id()));

    assert_eq!(fast_region.render(|| fast.read()).unwrap(), "fast");
    assert_eq!(slow_region.render(|| slow.read()).unwrap(), "Loading slow...");

    rt.wait_for_work().await;
    let dirty = rt.take_dirty();
    assert!(dirty.contains(&slow_region.id()));
    assert_eq!(slow_region.render(|| slow.read()).unwrap(), "slow");
}

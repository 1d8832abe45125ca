#![cfg(unix)]

use aegis_desktop::arbiter::{Arbiter, Arbitration, Endpoint};
use aegis_domain::events::InstanceActivated;
use aegis_domain::instance::ProcessRole;
use aegis_domain::platform::PlatformFamily;
use aegis_event_bus::EventBus;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

const TIMEOUT: Duration = Duration::from_millis(500);

fn arbiter(dir: &Path, allow_secondary: bool) -> Arbiter {
    Arbiter::with_endpoint(Endpoint::for_user("aegis", "tester", dir), TIMEOUT, allow_secondary)
}

#[tokio::test]
async fn second_instance_hands_off_and_primary_is_activated_once() {
    let tmp = tempdir().expect("tempdir");
    let primary_bus = EventBus::new();

    let primary = arbiter(tmp.path(), false).arbitrate(PlatformFamily::LinuxDesktop, &primary_bus).await;
    let Arbitration::Primary { listener: Some(listener) } = &primary else {
        panic!("expected a listening primary, got {primary:?}");
    };
    assert!(listener.endpoint().path().exists());
    let mut activations = primary_bus.take_queue::<InstanceActivated>(8).expect("queue");

    let secondary = arbiter(tmp.path(), false).arbitrate(PlatformFamily::LinuxDesktop, &EventBus::new()).await;
    assert!(secondary.should_exit());
    assert_eq!(secondary.role(), ProcessRole::Secondary);

    let received = tokio::time::timeout(TIMEOUT, activations.recv()).await.expect("activation");
    assert!(received.is_some());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(activations.try_recv().is_err());
}

#[tokio::test]
async fn stale_socket_is_replaced() {
    let tmp = tempdir().expect("tempdir");
    let endpoint = Endpoint::for_user("aegis", "tester", tmp.path());
    drop(std::os::unix::net::UnixListener::bind(endpoint.path()).expect("bind"));
    assert!(endpoint.path().exists());

    let outcome = arbiter(tmp.path(), false).arbitrate(PlatformFamily::LinuxDesktop, &EventBus::new()).await;
    assert!(matches!(outcome, Arbitration::Primary { listener: Some(_) }));
}

#[tokio::test]
async fn allowed_secondary_does_not_activate_the_primary() {
    let tmp = tempdir().expect("tempdir");
    let primary_bus = EventBus::new();
    let _primary = arbiter(tmp.path(), false).arbitrate(PlatformFamily::LinuxDesktop, &primary_bus).await;
    let mut activations = primary_bus.take_queue::<InstanceActivated>(8).expect("queue");

    let outcome = arbiter(tmp.path(), true).arbitrate(PlatformFamily::LinuxDesktop, &EventBus::new()).await;
    assert!(matches!(outcome, Arbitration::Secondary { handed_off: false }));
    assert!(!outcome.should_exit());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(activations.try_recv().is_err());
}

#[tokio::test]
async fn mobile_platforms_bypass_arbitration() {
    let tmp = tempdir().expect("tempdir");
    let arbiter = arbiter(tmp.path(), false);

    let outcome = arbiter.arbitrate(PlatformFamily::Android, &EventBus::new()).await;
    assert!(matches!(outcome, Arbitration::Primary { listener: None }));
    assert!(!arbiter.endpoint().path().exists());
}

#[tokio::test]
async fn dropping_the_listener_releases_the_endpoint() {
    let tmp = tempdir().expect("tempdir");
    let arbiter = arbiter(tmp.path(), false);

    let outcome = arbiter.arbitrate(PlatformFamily::MacOs, &EventBus::new()).await;
    assert!(arbiter.endpoint().path().exists());
    drop(outcome);
    assert!(!arbiter.endpoint().path().exists());
}

#[tokio::test]
async fn unresponsive_primary_resolves_to_primary_within_the_timeout() {
    let tmp = tempdir().expect("tempdir");
    let endpoint = Endpoint::for_user("aegis", "tester", tmp.path());
    // Bound and accepting into the backlog, but never answering.
    let _wedged = tokio::net::UnixListener::bind(endpoint.path()).expect("bind");

    let started = std::time::Instant::now();
    let short = Arbiter::with_endpoint(endpoint, Duration::from_millis(200), false);
    let outcome = short.arbitrate(PlatformFamily::LinuxDesktop, &EventBus::new()).await;

    assert!(matches!(outcome, Arbitration::Primary { listener: None }));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_launches_elect_exactly_one_primary() {
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path().to_path_buf();
    let patient = Duration::from_secs(2);

    let launches: Vec<_> = (0..6)
        .map(|_| {
            let dir = dir.clone();
            tokio::spawn(async move {
                let bus = EventBus::new();
                let arbiter = Arbiter::with_endpoint(Endpoint::for_user("aegis", "tester", &dir), patient, false);
                let outcome = arbiter.arbitrate(PlatformFamily::LinuxDesktop, &bus).await;
                (outcome, bus)
            })
        })
        .collect();

    let mut outcomes = Vec::new();
    for launch in launches {
        outcomes.push(launch.await.expect("launch"));
    }

    let listening: Vec<_> = outcomes
        .iter()
        .filter_map(|(outcome, _)| match outcome {
            Arbitration::Primary { listener: Some(listener) } => Some(listener),
            _ => None,
        })
        .collect();
    assert_eq!(listening.len(), 1, "{outcomes:?}");
    assert!(listening[0].endpoint().path().exists());
    assert_eq!(outcomes.iter().filter(|(outcome, _)| outcome.should_exit()).count(), 5);
}

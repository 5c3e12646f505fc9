use super::helpers::unique_config;

use instance_core::activation::activation_channel;
use instance_core::coordinator::{CoordinatorRole, InstanceCoordinator, send_activation};
use instance_core::protocol::ActivationMessage;

use std::time::{Duration, Instant};

use interprocess::local_socket::tokio::{Stream, prelude::*};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout as TokioTimeout;

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Writes raw bytes to the endpoint, bypassing the message vocabulary.
async fn send_raw(coordinator: &InstanceCoordinator, bytes: &[u8]) {
    let name = coordinator.identity().endpoint_name().expect("endpoint name");
    let stream = Stream::connect(name).await.expect("connect");
    let (_receiver, mut sender) = stream.split();
    sender.write_all(bytes).await.expect("write");
    sender.flush().await.expect("flush");
}

/// **VALUE**: Verifies a Secondary's `BringToFront` reaches the Primary's UI queue.
///
/// **WHY THIS MATTERS**: This is the whole point of a second launch: the running window
/// comes to the front.
///
/// **BUG THIS CATCHES**: Would catch a client and server that disagree on the endpoint
/// name or the line format.
#[tokio::test]
async fn given_running_primary_when_secondary_activates_then_message_dispatched() {
    // GIVEN
    let config = unique_config();
    let mut primary = InstanceCoordinator::new(config.clone());
    assert_eq!(primary.acquire().expect("acquire"), CoordinatorRole::Primary);

    let (sender, mut receiver) = activation_channel();
    let server = primary.start_server(sender).await.expect("start server");
    assert!(server.is_running());

    let mut secondary = InstanceCoordinator::new(config);
    assert_eq!(secondary.acquire().expect("acquire"), CoordinatorRole::Secondary);

    // WHEN
    secondary
        .activate_primary(ActivationMessage::BringToFront)
        .await
        .expect("activate primary");

    // THEN
    let received = TokioTimeout(RECEIVE_TIMEOUT, receiver.recv())
        .await
        .expect("message within timeout");
    assert_eq!(received, Some(ActivationMessage::BringToFront));

    primary.shutdown(Some(server)).await;
}

/// **VALUE**: Verifies bad connections are ignored and the server keeps serving.
///
/// **WHY THIS MATTERS**: Any local process can connect. One bad client must not take
/// down activation for the rest of the session.
///
/// **BUG THIS CATCHES**: Would catch a loop that returns on the first protocol error,
/// or a garbage line that is treated as an activation.
#[tokio::test]
async fn given_malformed_lines_when_received_then_ignored_and_server_keeps_serving() {
    let config = unique_config();
    let mut primary = InstanceCoordinator::new(config);
    primary.acquire().expect("acquire");

    let (sender, mut receiver) = activation_channel();
    let server = primary.start_server(sender).await.expect("start server");

    send_raw(&primary, b"bringtofront\n").await;
    send_raw(&primary, b"Shutdown\n").await;
    send_raw(&primary, &[b'x'; 1024]).await;
    send_raw(&primary, b"").await;

    send_activation(
        primary.identity(),
        ActivationMessage::BringToFront,
        Duration::from_millis(500),
    )
    .await
    .expect("valid activation after garbage");

    let received = TokioTimeout(RECEIVE_TIMEOUT, receiver.recv())
        .await
        .expect("message within timeout");
    assert_eq!(received, Some(ActivationMessage::BringToFront));
    assert_eq!(receiver.try_recv(), None);
    assert!(server.is_running());

    primary.shutdown(Some(server)).await;
}

/// **VALUE**: Verifies a client that connects and never writes cannot stall the server.
///
/// **BUG THIS CATCHES**: Would catch a read without a timeout.
#[tokio::test]
async fn given_silent_client_when_read_times_out_then_next_client_served() {
    let config = unique_config();
    let mut primary = InstanceCoordinator::new(config);
    primary.acquire().expect("acquire");

    let (sender, mut receiver) = activation_channel();
    let server = primary.start_server(sender).await.expect("start server");

    let name = primary.identity().endpoint_name().expect("endpoint name");
    let _silent = Stream::connect(name).await.expect("connect");

    send_activation(
        primary.identity(),
        ActivationMessage::BringToFront,
        Duration::from_secs(2),
    )
    .await
    .expect("activation after silent client");

    let received = TokioTimeout(RECEIVE_TIMEOUT, receiver.recv())
        .await
        .expect("message within timeout");
    assert_eq!(received, Some(ActivationMessage::BringToFront));

    primary.shutdown(Some(server)).await;
}

/// **VALUE**: Verifies shutdown stops the loop and releases the endpoint.
///
/// **WHY THIS MATTERS**: A Secondary launched during teardown must fail fast instead of
/// hanging on an endpoint nobody reads.
///
/// **BUG THIS CATCHES**: Would catch a listener that outlives the server task.
#[tokio::test]
async fn given_server_shut_down_when_client_connects_then_fails_fast() {
    let config = unique_config();
    let mut primary = InstanceCoordinator::new(config.clone());
    primary.acquire().expect("acquire");

    let (sender, _receiver) = activation_channel();
    let server = primary.start_server(sender).await.expect("start server");

    server
        .shutdown(Duration::from_secs(2))
        .await
        .expect("clean shutdown");

    let started = Instant::now();
    let result = send_activation(
        primary.identity(),
        ActivationMessage::BringToFront,
        Duration::from_millis(500),
    )
    .await;

    let error = result.expect_err("no server is listening");
    assert!(error.is_unreachable(), "unexpected error: {error}");
    assert!(started.elapsed() < Duration::from_secs(2));

    primary.shutdown(None).await;
}

/// **VALUE**: Verifies a Secondary with no Primary to talk to reports an unreachable error.
///
/// **WHY THIS MATTERS**: The Secondary tells the user once and exits; it must not hang.
///
/// **BUG THIS CATCHES**: Would catch a missing timeout around the connect.
#[tokio::test]
async fn given_no_server_when_activation_sent_then_unreachable_within_timeout() {
    let identity = unique_config().identity();
    let connect_timeout = Duration::from_millis(300);

    let started = Instant::now();
    let result = send_activation(&identity, ActivationMessage::BringToFront, connect_timeout).await;

    let error = result.expect_err("nothing is bound");
    assert!(error.is_unreachable(), "unexpected error: {error}");
    assert!(started.elapsed() < connect_timeout + Duration::from_secs(1));
}

/// **VALUE**: Verifies a restarted Primary can bind the same endpoint again.
///
/// **BUG THIS CATCHES**: Would catch a stale endpoint blocking the next bind.
#[tokio::test]
async fn given_previous_server_stopped_when_new_primary_starts_then_binds() {
    let config = unique_config();

    let mut first = InstanceCoordinator::new(config.clone());
    first.acquire().expect("acquire");
    let (sender, _receiver) = activation_channel();
    let server = first.start_server(sender).await.expect("start server");
    first.shutdown(Some(server)).await;

    let mut second = InstanceCoordinator::new(config);
    assert_eq!(second.acquire().expect("acquire"), CoordinatorRole::Primary);
    let (sender, mut receiver) = activation_channel();
    let server = second.start_server(sender).await.expect("rebind");

    send_activation(
        second.identity(),
        ActivationMessage::BringToFront,
        Duration::from_millis(500),
    )
    .await
    .expect("activation");
    let received = TokioTimeout(RECEIVE_TIMEOUT, receiver.recv())
        .await
        .expect("message within timeout");
    assert_eq!(received, Some(ActivationMessage::BringToFront));

    second.shutdown(Some(server)).await;
}

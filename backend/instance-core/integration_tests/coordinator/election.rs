use super::helpers::unique_config;

use instance_core::coordinator::{CoordinatorRole, InstanceCoordinator, InstanceLock, LockOutcome};
use instance_core::error::CoordinatorError;
use instance_core::protocol::ActivationMessage;

use std::sync::Barrier;
use std::thread;

/// **VALUE**: Verifies concurrent acquisitions elect exactly one Primary.
///
/// **WHY THIS MATTERS**: Two launches racing on a double-click must never both open a window.
///
/// **BUG THIS CATCHES**: Would catch a check-then-create race, e.g. checking for the
/// mutex before creating it.
#[test]
fn given_concurrent_launches_when_acquiring_then_exactly_one_primary() {
    // GIVEN
    let config = unique_config();
    let launches = 8;

    let decided = Barrier::new(launches);

    // WHEN
    let roles = thread::scope(|scope| {
        let handles = (0..launches)
            .map(|_| {
                let config = config.clone();
                let decided = &decided;
                scope.spawn(move || {
                    let mut coordinator = InstanceCoordinator::new(config);
                    let role = coordinator.acquire().expect("acquire");
                    // Hold every lock until all launches have decided.
                    decided.wait();
                    role
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("launch thread"))
            .collect::<Vec<_>>()
    });

    // THEN
    let primaries = roles
        .iter()
        .filter(|role| **role == CoordinatorRole::Primary)
        .count();
    assert_eq!(primaries, 1);
    assert_eq!(
        roles
            .iter()
            .filter(|role| **role == CoordinatorRole::Secondary)
            .count(),
        launches - 1
    );
}

/// **VALUE**: Verifies a released lock can be taken by the next launch.
///
/// **WHY THIS MATTERS**: After the Primary exits, the next launch must become Primary
/// instead of forwarding to nobody.
///
/// **BUG THIS CATCHES**: Would catch a release that leaves the lock held.
#[tokio::test]
async fn given_primary_shut_down_when_next_launch_acquires_then_primary() {
    let config = unique_config();

    let mut first = InstanceCoordinator::new(config.clone());
    assert_eq!(first.acquire().expect("acquire"), CoordinatorRole::Primary);

    let mut blocked = InstanceCoordinator::new(config.clone());
    assert_eq!(blocked.acquire().expect("acquire"), CoordinatorRole::Secondary);

    first.shutdown(None).await;

    let mut next = InstanceCoordinator::new(config);
    assert_eq!(next.acquire().expect("acquire"), CoordinatorRole::Primary);
}

/// **VALUE**: Verifies dropping a held lock frees it, the way process exit does.
///
/// **WHY THIS MATTERS**: A crashed Primary never calls shutdown.
///
/// **BUG THIS CATCHES**: Would catch a lock that outlives its owner.
#[test]
fn given_lock_dropped_when_reacquired_then_acquired() {
    let identity = unique_config().identity();

    let LockOutcome::Acquired(lock) = InstanceLock::try_acquire(&identity).expect("lock") else {
        panic!("first acquisition should succeed");
    };
    assert!(lock.name().contains(identity.identifier()));
    assert!(matches!(
        InstanceLock::try_acquire(&identity).expect("lock"),
        LockOutcome::AlreadyHeld
    ));

    drop(lock);

    assert!(matches!(
        InstanceLock::try_acquire(&identity).expect("lock"),
        LockOutcome::Acquired(_)
    ));
}

/// **VALUE**: Verifies the role is decided once.
///
/// **BUG THIS CATCHES**: Would catch a second `acquire` flipping a Secondary into a
/// Primary after the first Primary exited.
#[tokio::test]
async fn given_decided_role_when_acquired_again_then_unchanged() {
    let config = unique_config();
    let mut primary = InstanceCoordinator::new(config.clone());
    let mut secondary = InstanceCoordinator::new(config);

    assert_eq!(primary.acquire().expect("acquire"), CoordinatorRole::Primary);
    assert_eq!(secondary.acquire().expect("acquire"), CoordinatorRole::Secondary);

    primary.shutdown(None).await;

    assert_eq!(secondary.acquire().expect("acquire"), CoordinatorRole::Secondary);
    assert_eq!(secondary.role(), Some(CoordinatorRole::Secondary));
}

/// **VALUE**: Verifies branch operations are refused for the wrong role.
///
/// **WHY THIS MATTERS**: A Secondary must never bind the endpoint and a Primary must
/// never forward to itself.
///
/// **BUG THIS CATCHES**: Would catch missing role checks.
#[tokio::test]
async fn given_wrong_role_when_branch_operation_called_then_role_error() {
    let config = unique_config();
    let undecided = InstanceCoordinator::new(config.clone());
    let mut primary = InstanceCoordinator::new(config.clone());
    let mut secondary = InstanceCoordinator::new(config);

    let result = undecided.activate_primary(ActivationMessage::BringToFront).await;
    assert!(matches!(result, Err(CoordinatorError::Role { .. })));

    primary.acquire().expect("acquire");
    secondary.acquire().expect("acquire");

    let result = primary.activate_primary(ActivationMessage::BringToFront).await;
    assert!(matches!(result, Err(CoordinatorError::Role { .. })));

    let (sender, _receiver) = instance_core::activation::activation_channel();
    let result = secondary.start_server(sender).await;
    assert!(matches!(result, Err(CoordinatorError::Role { .. })));

    primary.shutdown(None).await;
}

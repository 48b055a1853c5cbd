use choreokit_core::SolverError;
use choreokit_document::{DocumentError, PlannerError, RobotConfig};
use choreokit_generation::{GenerateOutcome, GenerationError};

use crate::mocks::{samples, Harness};

#[tokio::test]
async fn test_generate_stores_samples() {
    let h = Harness::new();
    let path = h.fill_active(2);
    h.solver.respond(Ok(samples(5)));

    let outcome = h.manager.generate(path).await.unwrap();
    assert_eq!(outcome, GenerateOutcome::Generated { samples: 5 });

    let doc = h.manager.document().read();
    let p = doc.path(path).unwrap();
    assert_eq!(p.generated().len(), 5);
    assert!(!p.is_generating());
    assert!(p.can_export());
}

#[tokio::test]
async fn test_request_carries_resolved_description() {
    let h = Harness::new();
    let path = h.fill_active(3);
    h.manager.generate(path).await.unwrap();

    let requests = h.solver.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path_id, path);
    assert_eq!(requests[0].path.waypoints.len(), 3);
    assert!(requests[0].path.trajectory.is_none());
}

#[tokio::test]
async fn test_zero_torque_is_rejected_without_solving() {
    let h = Harness::new();
    let path = h.fill_active(2);
    h.cache(path, 4);
    h.manager
        .document()
        .write()
        .set_robot_config(RobotConfig {
            wheel_max_torque: 0.0,
            ..RobotConfig::default()
        })
        .unwrap();

    let err = h.manager.generate(path).await.unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Document(DocumentError::Planner(PlannerError::ZeroWheelMaxTorque))
    ));
    assert_eq!(err.to_string(), "Wheel max torque may not be 0");
    assert_eq!(h.solver.call_count(), 0);

    let doc = h.manager.document().read();
    let p = doc.path(path).unwrap();
    assert!(!p.is_generating());
    assert_eq!(p.generated(), samples(4).as_slice());
}

#[tokio::test]
async fn test_solver_failure_keeps_previous_trajectory() {
    let h = Harness::new();
    let path = h.fill_active(2);
    h.cache(path, 4);
    h.solver.respond(Err(SolverError::failed("Infeasible")));

    let err = h.manager.generate(path).await.unwrap_err();
    assert_eq!(err.to_string(), "Infeasible");

    let doc = h.manager.document().read();
    let p = doc.path(path).unwrap();
    assert!(!p.is_generating());
    assert_eq!(p.generated().len(), 4);
}

#[tokio::test]
async fn test_single_waypoint_cannot_generate() {
    let h = Harness::new();
    let path = h.fill_active(1);
    assert!(matches!(
        h.manager.generate(path).await,
        Err(GenerationError::NotEnoughWaypoints { .. })
    ));
    assert_eq!(h.solver.call_count(), 0);
}

#[tokio::test]
async fn test_second_request_while_generating_is_a_no_op() {
    let h = Harness::new();
    let path = h.fill_active(2);
    let (started, release) = h.solver.pause_next();

    let first = h.manager.generate(path);
    let second = async {
        started.notified().await;
        assert!(h.manager.document().read().path(path).unwrap().is_generating());
        let outcome = h.manager.generate(path).await;
        release.notify_one();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, Ok(GenerateOutcome::Generated { .. })));
    assert_eq!(second.unwrap(), GenerateOutcome::AlreadyGenerating);
    assert_eq!(h.solver.call_count(), 1);
}

#[tokio::test]
async fn test_path_deleted_mid_generation() {
    let h = Harness::new();
    let keep = h.active_path();
    let doomed = h.add_path("Doomed", 2);
    let (started, release) = h.solver.pause_next();

    let generation = h.manager.generate(doomed);
    let meddle = async {
        started.notified().await;
        h.manager.document().write().delete_path(doomed).unwrap();
        release.notify_one();
    };
    let (outcome, ()) = tokio::join!(generation, meddle);

    assert_eq!(outcome.unwrap(), GenerateOutcome::PathRemoved);
    let doc = h.manager.document().read();
    assert!(doc.path(doomed).is_none());
    assert!(doc.path(keep).unwrap().generated().is_empty());
}

#[tokio::test]
async fn test_restored_path_keeps_generation_guard() {
    let h = Harness::new();
    let doomed = h.add_path("Doomed", 2);
    let (started, release) = h.solver.pause_next();

    let first = h.manager.generate(doomed);
    let second = async {
        started.notified().await;
        {
            let mut doc = h.manager.document().write();
            doc.delete_path(doomed).unwrap();
            assert!(doc.undo());
            assert!(doc.path(doomed).unwrap().is_generating());
        }
        let outcome = h.manager.generate(doomed).await;
        release.notify_one();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, Ok(GenerateOutcome::Generated { .. })));
    assert_eq!(second.unwrap(), GenerateOutcome::AlreadyGenerating);
    assert_eq!(h.solver.call_count(), 1);
    let doc = h.manager.document().read();
    let p = doc.path(doomed).unwrap();
    assert!(!p.is_generating());
    assert!(!p.generated().is_empty());
}

#[tokio::test]
async fn test_result_for_deleted_path_returns_on_undo() {
    let h = Harness::new();
    let doomed = h.add_path("Doomed", 2);
    h.solver.respond(Ok(samples(6)));
    let (started, release) = h.solver.pause_next();

    let generation = h.manager.generate(doomed);
    let meddle = async {
        started.notified().await;
        h.manager.document().write().delete_path(doomed).unwrap();
        release.notify_one();
    };
    let (outcome, ()) = tokio::join!(generation, meddle);
    assert_eq!(outcome.unwrap(), GenerateOutcome::PathRemoved);

    let mut doc = h.manager.document().write();
    assert!(doc.undo());
    let p = doc.path(doomed).unwrap();
    assert!(!p.is_generating());
    assert_eq!(p.generated(), samples(6).as_slice());
}

#[tokio::test]
async fn test_waypoint_deleted_mid_generation_still_stores_result() {
    let h = Harness::new();
    let path = h.fill_active(3);
    let (started, release) = h.solver.pause_next();

    let generation = h.manager.generate(path);
    let meddle = async {
        started.notified().await;
        let mut doc = h.manager.document().write();
        let last = doc.path(path).unwrap().waypoints()[2].id();
        doc.delete_waypoint(path, last).unwrap();
        drop(doc);
        release.notify_one();
    };
    let (outcome, ()) = tokio::join!(generation, meddle);

    assert!(matches!(outcome, Ok(GenerateOutcome::Generated { samples: 3 })));
    // The solver saw the description captured at start.
    assert_eq!(h.solver.requests.lock()[0].path.waypoints.len(), 3);
    assert_eq!(
        h.manager.document().read().path(path).unwrap().waypoints().len(),
        2
    );
}

#[tokio::test]
async fn test_different_paths_generate_concurrently() {
    let h = Harness::new();
    let a = h.fill_active(2);
    let b = h.add_path("Other", 2);

    let (ra, rb) = tokio::join!(h.manager.generate(a), h.manager.generate(b));
    assert!(ra.is_ok() && rb.is_ok());
    assert_eq!(h.solver.call_count(), 2);
}

#[tokio::test]
async fn test_generation_is_not_undoable() {
    let h = Harness::new();
    let path = h.fill_active(2);
    let undo_idx = h.manager.document().read().history().undo_idx();
    h.manager.generate(path).await.unwrap();
    assert_eq!(h.manager.document().read().history().undo_idx(), undo_idx);
}

#[tokio::test]
async fn test_export_failure_keeps_generated_result() {
    let h = Harness::new();
    let path = h.fill_active(2);

    // Never saved: export cannot resolve a location.
    let err = h.manager.generate_and_export(path).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Couldn't export trajectory: Project has not been saved yet"
    );
    assert_eq!(
        h.manager.document().read().path(path).unwrap().generated().len(),
        3
    );
}

#[tokio::test]
async fn test_generate_and_export_writes_project_file() {
    let h = Harness::new();
    let path = h.fill_active(2);
    h.save_to("/robot").await;

    h.manager.generate_and_export(path).await.unwrap();
    assert!(h.fs.contents("/robot/deploy/choreo/NewPath.traj").is_some());
}

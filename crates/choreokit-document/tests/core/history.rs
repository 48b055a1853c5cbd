use std::sync::Arc;

use choreokit_core::EventBus;
use choreokit_document::{Constraint, ConstraintKind, Document, TrajectorySample, WaypointRef};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddPath,
    AddWaypoint(f64, f64),
    MoveFirstWaypoint(f64),
    AddStopPoint,
    DeleteLastWaypoint,
    ReorderWaypoints,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddPath),
        (-10.0..10.0f64, -10.0..10.0f64).prop_map(|(x, y)| Op::AddWaypoint(x, y)),
        (-10.0..10.0f64).prop_map(Op::MoveFirstWaypoint),
        Just(Op::AddStopPoint),
        Just(Op::DeleteLastWaypoint),
        Just(Op::ReorderWaypoints),
    ]
}

fn apply(doc: &mut Document, op: &Op) {
    let path = doc.active_path().id();
    let waypoints: Vec<_> = doc.active_path().waypoints().iter().map(|w| w.id()).collect();
    // Ops that do not apply to the current shape are skipped.
    let _ = match op {
        Op::AddPath => doc.add_path(None, false).map(|_| ()),
        Op::AddWaypoint(x, y) => {
            let (x, y) = (*x, *y);
            doc.add_waypoint(path).and_then(|id| {
                doc.update_waypoint(path, id, |w| {
                    w.x = x;
                    w.y = y;
                })
            })
        }
        Op::MoveFirstWaypoint(heading) => match waypoints.first() {
            Some(id) => doc.update_waypoint(path, *id, |w| w.heading = *heading),
            None => Ok(()),
        },
        Op::AddStopPoint => doc
            .add_constraint(
                path,
                Constraint::new(ConstraintKind::StopPoint, vec![WaypointRef::Last])
                    .expect("valid scope"),
            )
            .map(|_| ()),
        Op::DeleteLastWaypoint => match waypoints.last() {
            Some(id) => doc.delete_waypoint(path, *id).map(|_| ()),
            None => Ok(()),
        },
        Op::ReorderWaypoints if waypoints.len() >= 2 => {
            doc.reorder_waypoints(path, 0, waypoints.len() - 1)
        }
        Op::ReorderWaypoints => Ok(()),
    };
}

proptest! {
    #[test]
    fn undo_then_redo_restores_state(ops in proptest::collection::vec(op(), 1..20), back in 1usize..20) {
        let mut doc = Document::new(Arc::new(EventBus::new()));
        for op in &ops {
            apply(&mut doc, op);
        }
        // Selection is transient and not part of the recorded state.
        doc.clear_selection();
        let before = doc.state().clone();

        let mut undone = 0;
        while undone < back && doc.undo() {
            undone += 1;
        }
        for _ in 0..undone {
            prop_assert!(doc.redo());
        }
        prop_assert_eq!(doc.state(), &before);
    }

    #[test]
    fn redo_then_undo_restores_state(ops in proptest::collection::vec(op(), 2..20)) {
        let mut doc = Document::new(Arc::new(EventBus::new()));
        for op in &ops {
            apply(&mut doc, op);
        }
        doc.undo();
        doc.undo();
        doc.clear_selection();
        let before = doc.state().clone();

        let mut redone = 0;
        while doc.redo() {
            redone += 1;
        }
        for _ in 0..redone {
            prop_assert!(doc.undo());
        }
        prop_assert_eq!(doc.state(), &before);
    }
}

#[test]
fn test_cursor_stays_in_bounds() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.active_path().id();
    doc.add_waypoint(path).unwrap();
    doc.add_waypoint(path).unwrap();

    for _ in 0..5 {
        doc.undo();
    }
    assert_eq!(doc.history().undo_idx(), 0);
    for _ in 0..5 {
        doc.redo();
    }
    assert_eq!(doc.history().undo_idx(), doc.history().len());
}

#[test]
fn test_edit_after_undo_drops_redo() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.active_path().id();
    doc.add_waypoint(path).unwrap();
    doc.add_waypoint(path).unwrap();
    doc.undo();
    assert!(doc.can_redo());

    doc.rename_path(path, "Renamed").unwrap();
    assert!(!doc.can_redo());
    assert_eq!(
        doc.history().undo_description(),
        Some("Rename path")
    );
}

#[test]
fn test_history_depth_is_bounded() {
    let mut doc = Document::with_history_depth(Arc::new(EventBus::new()), 3);
    let path = doc.active_path().id();
    for _ in 0..5 {
        doc.add_waypoint(path).unwrap();
    }
    assert_eq!(doc.history().len(), 3);

    while doc.undo() {}
    assert_eq!(doc.active_path().waypoints().len(), 2);
}

#[test]
fn test_generation_results_survive_undo() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.active_path().id();
    doc.add_waypoint(path).unwrap();
    doc.add_waypoint(path).unwrap();
    doc.set_trajectory(
        path,
        vec![
            TrajectorySample::new(0.0, 0.0, 0.0, 0.0),
            TrajectorySample::new(2.0, 1.0, 0.0, 0.0),
        ],
    );
    doc.plan_control_intervals(path).unwrap();

    doc.rename_path(path, "Renamed").unwrap();
    doc.undo();
    assert_eq!(doc.active_path().name, "NewPath");
    assert_eq!(doc.active_path().total_time_seconds(), 2.0);
}

#[test]
fn test_cached_trajectory_survives_path_delete_and_undo() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let keep = doc.active_path().id();
    let path = doc.add_path(None, false).unwrap();
    doc.add_waypoint(path).unwrap();
    doc.add_waypoint(path).unwrap();
    let samples: Vec<_> = (0..5)
        .map(|i| TrajectorySample::new(i as f64 * 0.5, i as f64, 0.0, 0.0))
        .collect();
    assert!(doc.set_trajectory(path, samples.clone()));

    doc.delete_path(path).unwrap();
    assert!(doc.path(path).is_none());
    assert!(doc.undo());
    assert_eq!(doc.path(path).unwrap().generated(), samples.as_slice());

    // Redo deletes it again; a second undo still finds the samples.
    assert!(doc.redo());
    assert!(doc.path(path).is_none());
    assert!(doc.undo());
    assert_eq!(doc.path(path).unwrap().generated(), samples.as_slice());
    assert!(doc.path(keep).unwrap().generated().is_empty());
}

#[test]
fn test_undoing_path_creation_keeps_its_trajectory_for_redo() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.add_path(None, false).unwrap();
    let samples = vec![
        TrajectorySample::new(0.0, 0.0, 0.0, 0.0),
        TrajectorySample::new(1.5, 1.0, 0.0, 0.0),
    ];
    doc.set_trajectory(path, samples.clone());

    assert!(doc.undo());
    assert!(doc.path(path).is_none());
    assert!(doc.redo());
    assert_eq!(doc.path(path).unwrap().generated(), samples.as_slice());
}

use std::sync::Arc;

use choreokit_core::{ConstraintId, EventBus, WaypointId};
use choreokit_document::{Document, DocumentError, RobotPath, TrajectorySample, Waypoint};

fn path_with(n: usize) -> RobotPath {
    let mut path = RobotPath::new("Test");
    for i in 0..n {
        path.push_waypoint(Waypoint::at(i as f64, 0.0, 0.0));
    }
    path
}

#[test]
fn test_can_generate_truth_table() {
    for count in 0..4 {
        for generating in [false, true] {
            let mut path = path_with(count);
            path.set_generating(generating);
            assert_eq!(path.can_generate(), count >= 2 && !generating);
        }
    }
}

#[test]
fn test_delete_only_waypoint_clears_cached_trajectory() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.active_path().id();
    let only = doc.add_waypoint(path).unwrap();
    doc.set_trajectory(
        path,
        vec![
            TrajectorySample::new(0.0, 0.0, 0.0, 0.0),
            TrajectorySample::new(1.0, 0.0, 0.0, 0.0),
        ],
    );

    assert_eq!(doc.delete_waypoint(path, only).unwrap(), None);
    assert!(doc.active_path().generated().is_empty());
}

#[test]
fn test_delete_middle_selects_previous() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.active_path().id();
    let a = doc.add_waypoint(path).unwrap();
    let b = doc.add_waypoint(path).unwrap();
    doc.add_waypoint(path).unwrap();

    assert_eq!(doc.delete_waypoint(path, b).unwrap(), Some(a));
    assert_eq!(doc.active_path().lowest_selected_waypoint().map(|w| w.id()), Some(a));
}

#[test]
fn test_delete_first_selects_next() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.active_path().id();
    let a = doc.add_waypoint(path).unwrap();
    let b = doc.add_waypoint(path).unwrap();

    assert_eq!(doc.delete_waypoint(path, a).unwrap(), Some(b));
}

#[test]
fn test_delete_clears_selection_in_other_paths() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let first = doc.active_path().id();
    let other = doc.add_path(Some("Other"), false).unwrap();
    let selected_elsewhere = doc.add_waypoint(other).unwrap();
    assert!(doc.path(other).unwrap().waypoint(selected_elsewhere).unwrap().selected);

    let a = doc.add_waypoint(first).unwrap();
    doc.add_waypoint(first).unwrap();
    doc.delete_waypoint(first, a).unwrap();
    assert!(!doc.path(other).unwrap().has_selection());
}

#[test]
fn test_failed_delete_keeps_selection() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let path = doc.active_path().id();
    let selected = doc.add_waypoint(path).unwrap();
    doc.add_waypoint(path).unwrap();

    let missing = WaypointId::new();
    assert!(matches!(
        doc.delete_waypoint(path, missing),
        Err(DocumentError::WaypointNotFound(id)) if id == missing
    ));
    let missing = ConstraintId::new();
    assert!(matches!(
        doc.delete_constraint(path, missing),
        Err(DocumentError::ConstraintNotFound(id)) if id == missing
    ));

    assert!(doc.active_path().waypoint(selected).unwrap().selected);
    assert_eq!(doc.active_path().waypoints().len(), 2);
}

#[test]
fn test_duplicate_then_delete_original() {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    let original = doc.active_path().id();
    doc.add_waypoint(original).unwrap();
    let copy = doc.duplicate_path(original).unwrap();
    doc.delete_path(original).unwrap();

    assert_eq!(doc.path_list().len(), 1);
    assert_eq!(doc.active_path().id(), copy);
    assert_eq!(doc.active_path().waypoints().len(), 1);
}

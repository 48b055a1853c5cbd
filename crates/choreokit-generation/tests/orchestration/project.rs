use std::path::{Path, PathBuf};
use std::sync::Arc;

use choreokit_core::EventBus;

use choreokit_document::{Document, DocumentError};
use choreokit_generation::SaveError;
use choreokit_settings::Config;

use crate::mocks::Harness;

fn saved_json(path_names: &[&str]) -> String {
    let mut doc = Document::new(Arc::new(EventBus::new()));
    for name in path_names {
        doc.add_path(Some(name), false).unwrap();
    }
    doc.to_saved().to_json().unwrap()
}

#[tokio::test]
async fn test_open_file_adopts_location() {
    let h = Harness::new();
    h.fs.add_file("/robot/auto.chor", &saved_json(&["Score"]));
    h.fs.add_file("/robot/build.gradle", "");

    h.manager.open_file(Path::new("/robot/auto.chor")).await.unwrap();

    let location = h.manager.save_location().unwrap();
    assert_eq!(location.dir, PathBuf::from("/robot"));
    assert_eq!(location.name, "auto.chor");
    assert!(h.manager.is_gradle_project());
    assert!(h
        .manager
        .document()
        .read()
        .path_list()
        .find_by_name("Score")
        .is_some());
}

#[tokio::test]
async fn test_open_unsupported_version_keeps_document() {
    let h = Harness::new();
    h.fs.add_file(
        "/robot/old.chor",
        r#"{"version":"v9","robotConfiguration":{},"paths":[]}"#,
    );
    let before = h.active_path();

    let err = h
        .manager
        .open_file(Path::new("/robot/old.chor"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SaveError::Document(DocumentError::UnsupportedVersion(_))
    ));
    assert_eq!(h.active_path(), before);
    assert!(h.manager.save_location().is_none());
}

#[tokio::test]
async fn test_switch_to_gradle_reexports_trajectories() {
    let h = Harness::new();
    let path = h.active_path();
    h.cache(path, 3);
    h.save_to("/robot").await;
    assert!(h.fs.contents("/robot/src/main/deploy/choreo/NewPath.traj").is_none());

    h.fs.add_file("/robot/build.gradle", "");
    h.manager
        .save_file_as(Path::new("/robot"), "robot.chor")
        .await
        .unwrap();

    assert!(h.manager.is_gradle_project());
    assert!(h.fs.contents("/robot/src/main/deploy/choreo/NewPath.traj").is_some());
}

#[tokio::test]
async fn test_recorded_update_autosaves() {
    let h = Harness::new();
    h.save_to("/robot").await;

    h.manager
        .update(|doc| doc.add_path(Some("Extra"), false))
        .await
        .unwrap();
    assert!(h.fs.contents("/robot/robot.chor").unwrap().contains("Extra"));

    assert!(h.manager.undo().await);
    assert!(!h.fs.contents("/robot/robot.chor").unwrap().contains("Extra"));
}

#[tokio::test]
async fn test_unrecorded_update_does_not_autosave() {
    let h = Harness::new();
    h.save_to("/robot").await;
    h.fs.files.lock().clear();

    let path = h.active_path();
    h.manager
        .update(|doc| {
            doc.clear_selection();
            doc.set_active_path(path)
        })
        .await
        .unwrap();
    assert!(h.fs.files.lock().is_empty());
}

#[tokio::test]
async fn test_autosave_disabled_in_config() {
    let mut config = Config::default();
    config.project.autosave = false;
    let h = Harness::with_config(config);
    h.save_to("/robot").await;
    h.fs.files.lock().clear();

    h.manager
        .update(|doc| doc.add_path(Some("Extra"), false))
        .await
        .unwrap();
    assert!(h.fs.files.lock().is_empty());
}

#[tokio::test]
async fn test_unsaved_document_does_not_autosave() {
    let h = Harness::new();
    h.manager
        .update(|doc| doc.add_path(Some("Extra"), false))
        .await
        .unwrap();
    assert!(h.fs.files.lock().is_empty());
}

#[tokio::test]
async fn test_close_prompts_only_when_unsaved() {
    let h = Harness::new();
    h.manager.on_close_requested().await.unwrap();
    assert_eq!(*h.dialogs.prompts.lock(), vec!["Save project?".to_string()]);
    assert!(h.fs.files.lock().is_empty());

    h.save_to("/robot").await;
    h.dialogs.prompts.lock().clear();
    h.manager.on_close_requested().await.unwrap();
    assert!(h.dialogs.prompts.lock().is_empty());
}

#[tokio::test]
async fn test_close_saves_through_dialog() {
    let h = Harness::new();
    *h.dialogs.answer.lock() = true;
    h.dialogs.choose(Some("/robot/auto.chor"));
    h.fs.add_dir("/robot");

    h.manager.on_close_requested().await.unwrap();
    assert!(h.fs.contents("/robot/auto.chor").is_some());
    assert_eq!(
        h.manager.save_location().map(|l| l.file_path()),
        Some(PathBuf::from("/robot/auto.chor"))
    );
}

#[tokio::test]
async fn test_save_dialog_cancel() {
    let h = Harness::new();
    h.dialogs.choose(None);
    assert!(!h.manager.save_file().await.unwrap());
    assert!(h.manager.save_location().is_none());
}

#[tokio::test]
async fn test_new_file_forgets_location() {
    let h = Harness::new();
    h.save_to("/robot").await;
    h.manager.new_file();
    assert!(h.manager.save_location().is_none());
    assert!(!h.manager.is_gradle_project());
}

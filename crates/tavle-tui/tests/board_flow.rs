use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tavle_core::SprintPlan;
use tavle_domain::{Lane, Snapshot};
use tavle_persistence::{JsonLayoutStore, LayoutStore};
use tavle_tui::{App, AppMode, AppOptions};
use tempfile::TempDir;

fn snapshot(issues: serde_json::Value) -> Snapshot {
    serde_json::from_value(json!({ "issues": issues })).unwrap()
}

fn default_snapshot() -> Snapshot {
    snapshot(json!([
        {"key": "WEB-1", "summary": "Landing page", "status": "To Do", "priority": "High"},
        {"key": "WEB-2", "summary": "Login flow", "status": "In Progress"},
        {"key": "WEB-22", "summary": "Cleanup", "status": "Done", "priority": "Low"},
    ]))
}

fn test_app(dir: &TempDir) -> (App, Arc<JsonLayoutStore>) {
    let store = Arc::new(JsonLayoutStore::new(dir.path().join("layout.json")));
    let app = App::new(AppOptions {
        snapshot_path: dir.path().join("snapshot.json"),
        export_path: dir.path().join("board.html"),
        store: store.clone(),
        plan: SprintPlan::default(),
    });
    (app, store)
}

#[tokio::test]
async fn test_ingest_builds_board_and_counts() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = test_app(&dir);

    app.ingest_snapshot(Ok(default_snapshot())).await;

    let counts = app.counts();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.todo, 1);
    assert_eq!(counts.in_progress, 1);
    assert_eq!(counts.done, 1);
    assert!(app.banner.is_none());
    assert!(!app.loading);
}

#[tokio::test]
async fn test_empty_snapshot_renders_without_banner() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = test_app(&dir);

    app.ingest_snapshot(Ok(snapshot(json!([])))).await;

    assert_eq!(app.counts().total, 0);
    assert!(app.banner.is_none());
    assert!(app.visible_in_lane(Lane::Todo).is_empty());
}

#[tokio::test]
async fn test_saved_layout_overrides_status_placement() {
    let dir = TempDir::new().unwrap();
    let (mut app, store) = test_app(&dir);

    // previous session left WEB-1 in the done lane, plus one stale key
    store
        .save(&serde_json::from_value(json!({
            "todo": [],
            "inprog": [],
            "done": ["GONE-9", "WEB-1"]
        })).unwrap())
        .await;

    app.ingest_snapshot(Ok(default_snapshot())).await;

    assert_eq!(app.board.lane(Lane::Done), ["WEB-22", "WEB-1"]);
    assert_eq!(app.board.lane(Lane::Todo), [] as [&str; 0]);
    // counts reflect restored membership, and the stale key is gone
    assert_eq!(app.counts().done, 2);
    assert_eq!(app.counts().total, 3);
}

#[tokio::test]
async fn test_drop_persists_layout_and_recomputes_counts() {
    let dir = TempDir::new().unwrap();
    let (mut app, store) = test_app(&dir);
    app.ingest_snapshot(Ok(default_snapshot())).await;

    // grab WEB-1 in the todo lane and carry it to done
    app.grab_selected();
    assert_eq!(app.mode, AppMode::Moving);
    app.move_grabbed_lane(1);
    app.move_grabbed_lane(1);
    app.drop_grabbed().await;

    assert_eq!(app.mode, AppMode::Normal);
    assert_eq!(app.counts().done, 2);
    assert_eq!(app.counts().todo, 0);

    let saved = store.load().await.expect("layout persisted on drop");
    assert_eq!(saved.lanes.done, vec!["WEB-22", "WEB-1"]);
}

#[tokio::test]
async fn test_cancel_returns_card_to_grab_origin() {
    let dir = TempDir::new().unwrap();
    let (mut app, store) = test_app(&dir);
    app.ingest_snapshot(Ok(default_snapshot())).await;

    app.grab_selected();
    app.move_grabbed_lane(1);
    app.cancel_grab();

    assert_eq!(app.board.lane(Lane::Todo), ["WEB-1"]);
    assert_eq!(app.mode, AppMode::Normal);
    // a cancelled move persists nothing
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn test_fetch_failure_keeps_board_and_replaces_banner() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = test_app(&dir);
    app.ingest_snapshot(Ok(default_snapshot())).await;

    app.ingest_snapshot(Err("data not found".to_string())).await;
    let first = app.banner.clone().expect("banner after failure");
    assert!(first.message.contains("data not found"));
    assert_eq!(app.counts().total, 3);

    // a second failure updates the banner in place; the board stays
    app.ingest_snapshot(Err("connection refused".to_string())).await;
    let second = app.banner.clone().expect("banner still present");
    assert!(second.message.contains("connection refused"));
    assert!(!second.message.contains("data not found"));
    assert_eq!(app.counts().total, 3);
}

#[tokio::test]
async fn test_successful_reload_clears_banner() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = test_app(&dir);

    app.ingest_snapshot(Err("data not found".to_string())).await;
    assert!(app.banner.is_some());

    app.ingest_snapshot(Ok(default_snapshot())).await;
    assert!(app.banner.is_none());
}

#[tokio::test]
async fn test_reset_clears_persisted_layout_and_requests_reload() {
    let dir = TempDir::new().unwrap();
    let (mut app, store) = test_app(&dir);
    app.ingest_snapshot(Ok(default_snapshot())).await;
    app.take_reload_request();

    app.grab_selected();
    app.move_grabbed_lane(1);
    app.drop_grabbed().await;
    assert!(store.load().await.is_some());

    app.reset().await;
    assert!(store.load().await.is_none());
    assert!(app.take_reload_request());
    assert!(app.loading);
}

#[tokio::test]
async fn test_filtering_changes_visibility_but_not_counts() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = test_app(&dir);
    app.ingest_snapshot(Ok(default_snapshot())).await;

    app.cycle_priority_filter(); // priority: high
    assert_eq!(app.visible_in_lane(Lane::Todo).len(), 1);
    assert_eq!(app.visible_in_lane(Lane::InProgress).len(), 0);
    assert_eq!(app.visible_in_lane(Lane::Done).len(), 0);
    // lane membership and counters are untouched by filtering
    assert_eq!(app.counts().total, 3);
    assert_eq!(app.counts().in_progress, 1);

    app.clear_filters();
    assert_eq!(app.visible_in_lane(Lane::InProgress).len(), 1);
}

#[tokio::test]
async fn test_detail_modal_opens_and_closes() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = test_app(&dir);
    app.ingest_snapshot(Ok(default_snapshot())).await;

    app.open_detail();
    assert_eq!(app.mode, AppMode::Detail);
    assert_eq!(app.detail_key.as_deref(), Some("WEB-1"));

    app.handle_key(crossterm::event::KeyCode::Esc).await;
    assert_eq!(app.mode, AppMode::Normal);
    assert!(app.detail_key.is_none());
}

#[tokio::test]
async fn test_export_writes_escaped_page() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = test_app(&dir);
    app.ingest_snapshot(Ok(snapshot(json!([
        {"key": "WEB-1", "summary": "needs <b>care</b>", "status": "To Do"}
    ]))))
    .await;

    app.export_board().await;

    let page = std::fs::read_to_string(dir.path().join("board.html")).unwrap();
    assert!(page.contains("needs &lt;b&gt;care&lt;/b&gt;"));
    assert!(!page.contains("<b>care</b>"));
}

#[tokio::test]
async fn test_load_snapshot_reports_missing_file() {
    let missing = PathBuf::from("/nonexistent/tavle-snapshot.json");
    let result = tavle_tui::load_snapshot(&missing).await;
    let message = result.unwrap_err();
    assert!(message.contains("tavle-snapshot.json"));
}

//! Session lifecycle: auth flows, the cached list, and verification
//! spawning.

mod common;

use assert_matches::assert_matches;
use tokio::sync::mpsc;

use common::{fake_repository, FakeAuth};
use tracemark_core::classify::AssetFile;
use tracemark_core::error::CoreError;
use tracemark_core::target::{TargetChanges, TargetKind};
use tracemark_remote::session::SessionCache;
use tracemark_targets::{ProbeOutcome, TargetSession};

fn cache_in(dir: &tempfile::TempDir) -> SessionCache {
    SessionCache::new(dir.path().join("session.json"))
}

fn file(name: &str, media_type: &str) -> AssetFile {
    AssetFile::new(name, media_type, vec![1; 4])
}

#[tokio::test]
async fn open_without_cached_session_is_not_logged_in() {
    let dir = tempfile::tempdir().unwrap();
    let (_objects, _records, repo) = fake_repository();

    let err = TargetSession::open(&cache_in(&dir), repo).unwrap_err();
    assert_matches!(err, CoreError::NotLoggedIn);
}

#[tokio::test]
async fn login_then_open_scopes_list_to_the_user() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let auth = FakeAuth::new();

    let session = tracemark_targets::session::login(&auth, &cache, "a@b.test", "pw")
        .await
        .unwrap();
    assert_eq!(session.uid, "uid-a@b.test");
    assert_eq!(cache.load(), Some(session.clone()));

    let (_objects, _records, repo) = fake_repository();
    let mut target_session = TargetSession::open(&cache, repo).unwrap();
    assert_eq!(target_session.session().uid, "uid-a@b.test");
    assert!(target_session.refresh().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_login_writes_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let auth = FakeAuth::new();

    let err = tracemark_targets::session::login(&auth, &cache, "a@b.test", "")
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::AuthError { .. });
    assert_eq!(cache.load(), None);
}

#[tokio::test]
async fn register_persists_session() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let auth = FakeAuth::new();

    tracemark_targets::session::register(&auth, &cache, "new@b.test", "pw")
        .await
        .unwrap();
    assert!(cache.load().is_some());
}

#[tokio::test]
async fn logout_revokes_and_clears() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let auth = FakeAuth::new();

    tracemark_targets::session::login(&auth, &cache, "a@b.test", "pw")
        .await
        .unwrap();
    tracemark_targets::session::logout(&auth, &cache).await.unwrap();

    assert_eq!(auth.logout_calls(), 1);
    assert_eq!(cache.load(), None);

    // Logging out again is a no-op, not an error.
    tracemark_targets::session::logout(&auth, &cache).await.unwrap();
    assert_eq!(auth.logout_calls(), 1);
}

#[tokio::test]
async fn upload_and_delete_keep_the_cached_list_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let auth = FakeAuth::new();
    tracemark_targets::session::login(&auth, &cache, "a@b.test", "pw")
        .await
        .unwrap();

    let (_objects, _records, repo) = fake_repository();
    let mut session = TargetSession::open(&cache, repo).unwrap();

    let created = session
        .upload(vec![file("photo.jpg", "image/jpeg")])
        .await
        .unwrap();
    assert_eq!(session.targets().len(), 1);
    assert_eq!(session.targets()[0].owner_id, "uid-a@b.test");

    let outcome = session.delete(&created.id).await.unwrap();
    assert!(outcome.fully_clean());
    assert!(session.targets().is_empty());
}

#[tokio::test]
async fn edit_updates_name_and_kind() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let auth = FakeAuth::new();
    tracemark_targets::session::login(&auth, &cache, "a@b.test", "pw")
        .await
        .unwrap();

    let (_objects, _records, repo) = fake_repository();
    let mut session = TargetSession::open(&cache, repo).unwrap();
    let created = session.upload(vec![file("logo.patt", "")]).await.unwrap();

    let changes = TargetChanges {
        display_name: Some("front door".into()),
        kind: Some(TargetKind::PatternMarker),
        ..Default::default()
    };
    let updated = session.edit(&created.id, &changes).await.unwrap();
    assert_eq!(updated.display_name, "front door");
    assert_eq!(session.targets()[0].display_name, "front door");
}

#[tokio::test]
async fn verification_is_spawned_only_for_feature_targets() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let auth = FakeAuth::new();
    tracemark_targets::session::login(&auth, &cache, "a@b.test", "pw")
        .await
        .unwrap();

    let (_objects, _records, repo) = fake_repository();
    let mut session = TargetSession::open(&cache, repo).unwrap();
    session.upload(vec![file("logo.patt", "")]).await.unwrap();
    session
        .upload(vec![
            file("a.iset", ""),
            file("a.fset", ""),
            file("a.fset3", ""),
        ])
        .await
        .unwrap();

    let (tx, mut rx) = mpsc::channel(8);
    session.spawn_descriptor_verification(tx);

    // The fake store's URLs point at an unused host, so every probe
    // reports Unreachable — exactly one per descriptor suffix, and
    // none for the pattern target.
    let mut reports = Vec::new();
    while let Some(report) = rx.recv().await {
        reports.push(report);
    }
    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert_matches!(report.outcome, ProbeOutcome::Unreachable(_));
        assert!(!report.is_found());
    }
    session.close();
}

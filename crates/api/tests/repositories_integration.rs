//! Repository behaviour checked directly against the database.

mod common;

use std::time::Duration;

use common::TestApp;
use domain::models::banner::{BannerChanges, NewBanner};
use domain::models::changelog::{ChangelogChanges, NewChangelog};
use domain::models::version::NewVersion;
use persistence::repositories::{BannerRepository, ChangelogRepository, VersionRepository};

async fn insert_version(app: &TestApp, repo: &VersionRepository, text: &str) -> i64 {
    let id = app.state.ids.next_id();
    repo.insert(&NewVersion {
        id,
        version_text: text.to_string(),
        summary: "fixes".to_string(),
        file: String::new(),
        platform: app.platform.clone(),
    })
    .await
    .unwrap();
    id
}

async fn insert_banner(app: &TestApp, repo: &BannerRepository) -> i64 {
    let id = app.state.ids.next_id();
    repo.insert_batch(&[NewBanner {
        id,
        title: "Orientation week".to_string(),
        link: "https://example.org/week".to_string(),
        img: format!("{}/v1.1.1", id),
        platform: app.platform.clone(),
    }])
    .await
    .unwrap();
    id
}

#[tokio::test]
async fn test_republishing_current_version_alongside_another_publish() {
    let app = TestApp::spawn().await;
    let repo = VersionRepository::new(app.pool.clone());
    let first = insert_version(&app, &repo, "1.0.0").await;
    let current = insert_version(&app, &repo, "1.1.0").await;
    assert!(repo.publish(current).await.unwrap().is_some());

    // One side always targets the row that is published right now.
    for _ in 0..50 {
        let (a, b) = tokio::join!(repo.publish(first), repo.publish(current));
        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());
        assert_eq!(repo.count_published(&app.platform).await.unwrap(), 1);
    }
}

#[tokio::test]
async fn test_publish_of_deleted_version_changes_nothing() {
    let app = TestApp::spawn().await;
    let repo = VersionRepository::new(app.pool.clone());
    let live = insert_version(&app, &repo, "2.0.0").await;
    let gone = insert_version(&app, &repo, "2.1.0").await;
    repo.publish(live).await.unwrap();
    repo.soft_delete(gone).await.unwrap();

    assert!(repo.publish(gone).await.unwrap().is_none());
    assert_eq!(repo.count_published(&app.platform).await.unwrap(), 1);
    assert_eq!(repo.find_by_id(live).await.unwrap().unwrap().status, 2);
}

#[tokio::test]
async fn test_soft_delete_twice_keeps_row_deleted() {
    let app = TestApp::spawn().await;
    let repo = BannerRepository::new(app.pool.clone());
    let id = insert_banner(&app, &repo).await;

    assert_eq!(repo.soft_delete(id).await.unwrap(), 1);
    assert!(repo.find_by_id(id).await.unwrap().is_none());

    // Unguarded: the second delete still matches the row and leaves it deleted.
    assert_eq!(repo.soft_delete(id).await.unwrap(), 1);
    assert!(repo.find_by_id(id).await.unwrap().is_none());

    let status: (i16,) = sqlx::query_as("SELECT status FROM banner WHERE id = $1")
        .bind(id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(status.0, 1);
}

#[tokio::test]
async fn test_empty_update_only_refreshes_update_time() {
    let app = TestApp::spawn().await;
    let repo = BannerRepository::new(app.pool.clone());
    let id = insert_banner(&app, &repo).await;
    let before = repo.find_by_id(id).await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(repo.update(id, &BannerChanges::default()).await.unwrap(), 1);

    let after = repo.find_by_id(id).await.unwrap().unwrap();
    assert!(after.update_time > before.update_time);
    assert_eq!(after.title, before.title);
    assert_eq!(after.link, before.link);
    assert_eq!(after.img, before.img);
    assert_eq!(after.platform, before.platform);
    assert_eq!(after.status, before.status);
    assert_eq!(after.create_time, before.create_time);
}

#[tokio::test]
async fn test_empty_changelog_update_skips_deleted_rows() {
    let app = TestApp::spawn().await;
    let repo = ChangelogRepository::new(app.pool.clone());
    let id = app.state.ids.next_id();
    repo.insert_batch(&[NewChangelog {
        id,
        title: "Timetable import".to_string(),
        content: "Faster sync".to_string(),
        version_text: "3.2.0".to_string(),
        platform: app.platform.clone(),
    }])
    .await
    .unwrap();
    let before = repo.find_by_id(id).await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(repo.update(id, &ChangelogChanges::default()).await.unwrap(), 1);
    let after = repo.find_by_id(id).await.unwrap().unwrap();
    assert!(after.update_time > before.update_time);
    assert_eq!(after.version_text, "3.2.0");

    repo.soft_delete(id).await.unwrap();
    assert_eq!(repo.update(id, &ChangelogChanges::default()).await.unwrap(), 0);
}

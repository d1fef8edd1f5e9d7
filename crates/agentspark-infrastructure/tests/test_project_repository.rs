use agentspark_core::agent::Agent;
use agentspark_core::level::Level;
use agentspark_core::project::{ChatMessage, ProjectRecord, ProjectRepository, ProjectSnapshot};
use agentspark_infrastructure::JsonProjectRepository;
use chrono::{DateTime, Utc};
use tempfile::TempDir;

fn snapshot(topic: &str) -> ProjectSnapshot {
    let mut snapshot = ProjectSnapshot {
        topic: topic.to_string(),
        level: Level::Pozar,
        agents: vec![Agent {
            id: "pm".into(),
            name: "Product Manager".into(),
            ..Default::default()
        }],
        ..Default::default()
    };
    snapshot.chat_history.push(ChatMessage::user("A CRM for bakeries"));
    let mut store = snapshot.version_store();
    store.commit_origin(
        &snapshot.agents,
        &snapshot.files,
        format!("Original team — {topic}"),
    );
    snapshot.update_from_store(&store);
    snapshot
}

fn at(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap()
}

#[tokio::test]
async fn test_create_and_find() {
    let dir = TempDir::new().unwrap();
    let repo = JsonProjectRepository::new(dir.path()).await.unwrap();

    let record = repo.create(snapshot("Bakery CRM")).await.unwrap();
    assert!(record.id.starts_with("proj_"));
    assert_eq!(record.name, "Bakery CRM");
    assert!(dir.path().join(format!("{}.json", record.id)).exists());

    let loaded = repo.find_by_id(&record.id).await.unwrap().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.snapshot.version_history.len(), 1);
    assert!(loaded.snapshot.version_history[0].is_origin);
}

#[tokio::test]
async fn test_find_unknown_and_invalid_ids() {
    let dir = TempDir::new().unwrap();
    let repo = JsonProjectRepository::new(dir.path()).await.unwrap();

    assert!(repo.find_by_id("proj_0_zzzzz").await.unwrap().is_none());
    assert!(repo.find_by_id("../config").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_newest_first_and_skips_garbage() {
    let dir = TempDir::new().unwrap();
    let repo = JsonProjectRepository::new(dir.path()).await.unwrap();

    let older = ProjectRecord::new("proj_1_aaaaa", snapshot("Older"), at(1_000));
    let mut newer = ProjectRecord::new("proj_2_bbbbb", snapshot("Newer"), at(2_000));
    repo.save(&older).await.unwrap();
    repo.save(&newer).await.unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Newer", "Older"]);

    // Touching the older project moves it to the front
    let mut touched = older.clone();
    touched.update(snapshot("Older, renamed"), at(3_000));
    repo.save(&touched).await.unwrap();
    newer.update(newer.snapshot.clone(), at(2_500));
    repo.save(&newer).await.unwrap();

    let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Older, renamed", "Newer"]);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let repo = JsonProjectRepository::new(dir.path()).await.unwrap();

    let record = repo.create(snapshot("Temp")).await.unwrap();
    repo.delete(&record.id).await.unwrap();
    repo.delete(&record.id).await.unwrap();
    assert!(repo.find_by_id(&record.id).await.unwrap().is_none());
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fork_copies_history_under_new_id() {
    let dir = TempDir::new().unwrap();
    let repo = JsonProjectRepository::new(dir.path()).await.unwrap();

    let source = ProjectRecord::new("proj_1_aaaaa", snapshot("Bakery CRM"), at(1_000));
    repo.save(&source).await.unwrap();

    let copy = repo.fork(&source.id).await.unwrap();
    assert_ne!(copy.id, source.id);
    assert_eq!(copy.name, "Bakery CRM (copy)");
    assert!(copy.created_at > source.created_at);
    assert_eq!(copy.snapshot, source.snapshot);
    assert_eq!(repo.list().await.unwrap().len(), 2);

    let err = repo.fork("proj_9_nopes").await.unwrap_err();
    assert!(err.is_not_found());
}

use agentspark_core::agent::Agent;
use agentspark_core::level::Level;
use agentspark_core::project::ProjectSnapshot;
use agentspark_infrastructure::export::{MANIFEST_FILE, MANIFEST_VERSION};
use agentspark_infrastructure::{export_team, read_manifest};
use chrono::DateTime;
use tempfile::TempDir;

fn snapshot() -> ProjectSnapshot {
    let mut snapshot = ProjectSnapshot {
        topic: "Bakery CRM".into(),
        level: Level::Iskra,
        lang: "pl".into(),
        agents: vec![Agent {
            id: "pm".into(),
            name: "Product Manager".into(),
            ..Default::default()
        }],
        ..Default::default()
    };
    snapshot
        .files
        .insert("agent-pm.md".into(), "# Agent: Product Manager".into());
    snapshot.files.insert("README.md".into(), "# Team".into());
    snapshot
}

#[tokio::test]
async fn test_export_writes_files_and_manifest() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("bakery-crm");
    let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();

    let summary = export_team(&snapshot(), &target, now).await.unwrap();
    assert_eq!(summary.written, vec!["README.md", "agent-pm.md", MANIFEST_FILE]);
    assert_eq!(
        std::fs::read_to_string(target.join("agent-pm.md")).unwrap(),
        "# Agent: Product Manager"
    );

    let manifest = read_manifest(&target).await.unwrap();
    assert_eq!(manifest.v, MANIFEST_VERSION);
    assert_eq!(manifest.source, "agentspark");
    assert_eq!(manifest.lang, "pl");
    assert_eq!(manifest.ts, 1_700_000_000_000);
    assert_eq!(manifest.agents, snapshot().agents);
    assert_eq!(manifest.files, snapshot().files);
}

#[tokio::test]
async fn test_export_rejects_escaping_file_names() {
    let dir = TempDir::new().unwrap();
    let mut snapshot = snapshot();
    snapshot.files.insert("../evil.md".into(), "x".into());

    let result = export_team(&snapshot, dir.path().join("out"), chrono::Utc::now()).await;
    assert!(result.unwrap_err().is_config());
    assert!(!dir.path().join("evil.md").exists());
}

#[tokio::test]
async fn test_export_requires_agents() {
    let dir = TempDir::new().unwrap();
    let empty = ProjectSnapshot::default();
    assert!(export_team(&empty, dir.path(), chrono::Utc::now()).await.is_err());
}

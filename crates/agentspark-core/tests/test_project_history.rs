use agentspark_core::agent::{Agent, AgentType, FileMap, agent_file_name, skill_file_name};
use agentspark_core::project::{ChatMessage, ProjectRecord, ProjectSnapshot};
use agentspark_core::version::VersionStore;
use chrono::Utc;

fn agent(id: &str, name: &str) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        emoji: "🤖".to_string(),
        agent_type: AgentType::Technical,
        role: format!("{name} role"),
        description: format!("{name} description"),
        agent_doc: format!("# Agent: {name}"),
        skill_doc: format!("# Skill: {name}"),
        ..Default::default()
    }
}

fn files(agents: &[Agent]) -> FileMap {
    let mut files = FileMap::new();
    for a in agents {
        files.insert(a.agent_file_name(), a.agent_doc.clone());
        files.insert(a.skill_file_name(), a.skill_doc.clone());
    }
    files.insert("README.md".to_string(), "# Team".to_string());
    files
}

#[test]
fn test_history_survives_project_round_trip() {
    let mut store = VersionStore::new();
    let origin = vec![agent("pm", "Planner"), agent("dev", "Builder")];
    store.commit_origin(&origin, &files(&origin), "Original team — Todo app");

    let refined = vec![agent("pm", "Planner"), agent("qa", "Tester")];
    store
        .commit_refinement(&refined, &files(&refined), "Swap builder for tester")
        .expect("Should commit refinement");
    store.restore(0).expect("Should restore origin");

    let mut snapshot = ProjectSnapshot {
        topic: "Todo app".to_string(),
        chat_history: vec![ChatMessage::ai("What is it?"), ChatMessage::user("Todos")],
        ..Default::default()
    };
    snapshot.update_from_store(&store);
    let record = ProjectRecord::new("proj_1_abcde", snapshot, Utc::now());

    let json = serde_json::to_string_pretty(&record).expect("Should serialize");
    let loaded: ProjectRecord = serde_json::from_str(&json).expect("Should deserialize");
    assert_eq!(loaded, record);

    let mut reloaded = loaded.snapshot.version_store();
    assert_eq!(reloaded.versions(), store.versions());
    assert_eq!(reloaded.working(), store.working());
    assert_eq!(reloaded.latest().map(|v| v.label.as_str()), Some("Restored v1"));

    // Diffs computed after reload behave as before saving
    let next = vec![agent("pm", "Planner"), agent("ops", "Operator")];
    let version = reloaded
        .commit_refinement(&next, &files(&next), "Add ops")
        .expect("Should commit after reload");
    assert_eq!(version.version_number, 4);
    assert_eq!(version.diff.added, vec!["ops".to_string()]);
    assert_eq!(version.diff.removed, vec!["dev".to_string()]);
    assert_eq!(version.name_of("dev"), "Builder");
}

#[test]
fn test_removed_agent_files_found_by_id() {
    let team = vec![agent("pm", "Planner"), agent("dev", "Builder")];
    let mut team_files = files(&team);

    let diff = agentspark_core::version::diff_agents(&team, &team[..1]);
    for id in &diff.diff.removed {
        assert!(team_files.remove(&agent_file_name(id)).is_some());
        assert!(team_files.remove(&skill_file_name(id)).is_some());
    }

    let names: Vec<&str> = team_files.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["README.md", "agent-pm.md", "skill-pm.md"]);
}

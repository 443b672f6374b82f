use atlas_core::db::open_db_in_memory;
use atlas_core::ingest::profile::build_repo_profile;
use atlas_core::{
    CatalogError, CodeownersFile, IngestedRepo, OwnerKind, OwnershipCatalog, OwnershipStatus,
    RepoTextFiles, SqliteOwnershipCatalog,
};
use uuid::Uuid;

fn ingested(name: &str, readme: Option<&str>, codeowners: Option<&str>) -> IngestedRepo {
    let files = RepoTextFiles {
        readme: readme.map(str::to_string),
        codeowners: CodeownersFile {
            path: codeowners.map(|_| ".github/CODEOWNERS".to_string()),
            text: codeowners.map(str::to_string),
        },
    };
    let (profile, ownership) =
        build_repo_profile("acme", name, &files, vec!["Rust".to_string()], "README.md");
    IngestedRepo { profile, ownership }
}

fn sample_run() -> Vec<IngestedRepo> {
    vec![
        ingested("web", None, Some("* @acme/ui\n")),
        ingested(
            "api",
            Some("## Ownership\n**Owning team:** @acme/a\n"),
            Some("* @acme/b\n"),
        ),
        ingested("empty", None, None),
        ingested("tool", None, Some("* @alice\n")),
    ]
}

#[test]
fn records_and_reports_a_run() {
    let mut conn = open_db_in_memory().unwrap();
    let mut catalog = SqliteOwnershipCatalog::new(&mut conn);
    let repos = sample_run();

    let run_id = catalog.record_run("acme", &repos).unwrap();
    let run = catalog.latest_run().unwrap().unwrap();
    assert_eq!(run.id, run_id);
    assert_eq!(run.org, "acme");
    assert_eq!(run.repo_count, 4);

    let all = catalog.list_resolutions(run_id, None).unwrap();
    let names: Vec<_> = all.iter().map(|record| record.full_name.as_str()).collect();
    assert_eq!(names, vec!["acme/api", "acme/empty", "acme/tool", "acme/web"]);
    assert_eq!(all[0].status, OwnershipStatus::Conflict);
    assert_eq!(all[0].owner_display, "@acme/a");
    assert_eq!(all[1].owner_kind, OwnerKind::Unknown);
    assert_eq!(all[2].owner_kind, OwnerKind::Person);
    assert_eq!(all[0].ownership, repos[1].ownership);

    let ok_only = catalog
        .list_resolutions(run_id, Some(OwnershipStatus::Ok))
        .unwrap();
    assert_eq!(ok_only.len(), 2);
    assert!(ok_only
        .iter()
        .all(|record| record.status == OwnershipStatus::Ok));

    let counts = catalog.status_counts(run_id).unwrap();
    assert_eq!(counts.get(&OwnershipStatus::Ok), Some(&2));
    assert_eq!(counts.get(&OwnershipStatus::Conflict), Some(&1));
    assert_eq!(counts.get(&OwnershipStatus::Unknown), Some(&1));
    assert_eq!(counts.get(&OwnershipStatus::Placeholder), None);

    let profiles = catalog.load_profiles(run_id).unwrap();
    assert_eq!(profiles.len(), 4);
    assert_eq!(profiles[3], repos[0].profile);
}

#[test]
fn latest_run_is_the_most_recent_one() {
    let mut conn = open_db_in_memory().unwrap();
    let mut catalog = SqliteOwnershipCatalog::new(&mut conn);
    assert!(catalog.latest_run().unwrap().is_none());

    let first = catalog.record_run("acme", &sample_run()).unwrap();
    let second = catalog.record_run("acme", &sample_run()[..1]).unwrap();
    assert_ne!(first, second);

    let latest = catalog.latest_run().unwrap().unwrap();
    assert_eq!(latest.id, second);
    assert_eq!(latest.repo_count, 1);
    assert_eq!(catalog.load_profiles(first).unwrap().len(), 4);
}

#[test]
fn unknown_run_ids_are_reported() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = SqliteOwnershipCatalog::new(&mut conn);
    let missing = Uuid::new_v4();

    match catalog.status_counts(missing).unwrap_err() {
        CatalogError::RunNotFound(id) => assert_eq!(id, missing),
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        catalog.list_resolutions(missing, None),
        Err(CatalogError::RunNotFound(_))
    ));
}

#[test]
fn empty_runs_are_recorded() {
    let mut conn = open_db_in_memory().unwrap();
    let mut catalog = SqliteOwnershipCatalog::new(&mut conn);

    let run_id = catalog.record_run("acme", &[]).unwrap();
    assert!(catalog.status_counts(run_id).unwrap().is_empty());
    assert!(catalog.list_resolutions(run_id, None).unwrap().is_empty());
}

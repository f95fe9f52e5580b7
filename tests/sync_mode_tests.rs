//! Scenario tests for the sync engine, merge, and push over real repositories.

use git2::{Oid, Repository, Signature};
use serial_test::serial;
use stackpr::cli::commands;
use stackpr::config::{StackSettings, SyncMode};
use stackpr::errors::StackError;
use stackpr::git::{GitRepository, PullOutcome};
use stackpr::stack::{Stack, SyncEngine};
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    let repo = Repository::init(&repo_path).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    let signature = Signature::now("Test User", "test@example.com").unwrap();
    let tree_id = {
        let mut index = repo.index().unwrap();
        index.write_tree().unwrap()
    };
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial commit",
        &tree,
        &[],
    )
    .unwrap();

    (temp_dir, repo_path)
}

fn commit_file(repo_path: &Path, filename: &str, message: &str) -> Oid {
    let repo = Repository::open(repo_path).unwrap();
    std::fs::write(repo_path.join(filename), format!("Content for {filename}\n")).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(filename)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let signature = Signature::now("Test User", "test@example.com").unwrap();
    let parent = repo.head().unwrap().peel_to_commit().unwrap();
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &[&parent],
    )
    .unwrap()
}

/// Create a branch at the current HEAD, check it out, and add one commit.
fn stacked_branch(repo: &GitRepository, repo_path: &Path, name: &str) -> Oid {
    repo.create_branch_from_head(name).unwrap();
    repo.checkout_branch(name).unwrap();
    commit_file(repo_path, &format!("{name}.txt"), &format!("Add {name}"))
}

fn settings_with(base: &str, branches: &[&str], mode: SyncMode) -> StackSettings {
    StackSettings {
        base: base.to_string(),
        branches: branches.iter().map(|b| b.to_string()).collect(),
        sync_mode: mode,
        ..StackSettings::default()
    }
}

#[test]
fn test_reset_sync_chains_through_updated_parents() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    stacked_branch(&repo, &repo_path, "a");
    stacked_branch(&repo, &repo_path, "b");
    stacked_branch(&repo, &repo_path, "c");

    // Advance the base after the stack was built
    repo.checkout_branch(&base).unwrap();
    let base_tip = commit_file(&repo_path, "base2.txt", "Advance base");

    let settings = settings_with(&base, &["a", "b", "c"], SyncMode::Reset);
    let stack = Stack::new(settings.base.clone(), settings.branches.clone());
    let engine = SyncEngine::new(&repo, &settings);

    let mut synced = Vec::new();
    engine
        .sync_stack(&stack, |branch, parent| {
            synced.push((branch.to_string(), parent.to_string()));
        })
        .unwrap();

    assert_eq!(
        synced,
        vec![
            ("a".to_string(), base.clone()),
            ("b".to_string(), "a".to_string()),
            ("c".to_string(), "b".to_string()),
        ]
    );

    // Each reset saw its parent's already-updated state, so the whole chain
    // collapsed onto the advanced base
    assert_eq!(repo.branch_commit_id("a").unwrap(), base_tip);
    assert_eq!(repo.branch_commit_id("b").unwrap(), base_tip);
    assert_eq!(repo.branch_commit_id("c").unwrap(), base_tip);
}

#[test]
fn test_rebase_sync_replays_onto_parent() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    stacked_branch(&repo, &repo_path, "a");

    repo.checkout_branch(&base).unwrap();
    let base_tip = commit_file(&repo_path, "base2.txt", "Advance base");

    let settings = settings_with(&base, &["a"], SyncMode::Rebase);
    let stack = Stack::new(settings.base.clone(), settings.branches.clone());
    let engine = SyncEngine::new(&repo, &settings);

    engine.sync_stack(&stack, |_, _| {}).unwrap();

    // a's commit was replayed on top of the advanced base
    let a_tip = repo.branch_commit_id("a").unwrap();
    let git_repo = Repository::open(&repo_path).unwrap();
    let a_commit = git_repo.find_commit(a_tip).unwrap();
    assert_eq!(a_commit.parent(0).unwrap().id(), base_tip);
    assert!(repo_path.join("a.txt").exists());
    assert!(repo_path.join("base2.txt").exists());
}

#[test]
fn test_merge_sync_falls_back_to_local_merge_without_remote() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    stacked_branch(&repo, &repo_path, "a");

    repo.checkout_branch(&base).unwrap();
    let base_tip = commit_file(&repo_path, "base2.txt", "Advance base");

    // No remote named "origin" exists, so the pull fails and the engine
    // degrades to a local merge of the parent ref
    let settings = settings_with(&base, &["a"], SyncMode::Merge);
    let stack = Stack::new(settings.base.clone(), settings.branches.clone());
    let engine = SyncEngine::new(&repo, &settings);

    engine.sync_stack(&stack, |_, _| {}).unwrap();

    let a_tip = repo.branch_commit_id("a").unwrap();
    let git_repo = Repository::open(&repo_path).unwrap();
    let a_commit = git_repo.find_commit(a_tip).unwrap();

    // Both histories met in a merge commit
    assert_eq!(a_commit.parent_count(), 2);
    let parents: Vec<Oid> = a_commit.parent_ids().collect();
    assert!(parents.contains(&base_tip));
    assert!(repo_path.join("a.txt").exists());
    assert!(repo_path.join("base2.txt").exists());
}

#[test]
fn test_sync_aborts_on_missing_branch_without_continuing() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    stacked_branch(&repo, &repo_path, "a");
    repo.checkout_branch(&base).unwrap();

    let settings = settings_with(&base, &["a", "ghost"], SyncMode::Reset);
    let stack = Stack::new(settings.base.clone(), settings.branches.clone());
    let engine = SyncEngine::new(&repo, &settings);

    let mut synced = Vec::new();
    let err = engine
        .sync_stack(&stack, |branch, _| synced.push(branch.to_string()))
        .unwrap_err();

    assert!(matches!(err, StackError::BranchNotFound(name) if name == "ghost"));
    // The first branch completed and stayed synced; nothing ran after the
    // failure
    assert_eq!(synced, vec!["a"]);
}

#[test]
#[serial]
fn test_merge_command_merges_child_into_parent_and_keeps_it_stacked() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    stacked_branch(&repo, &repo_path, "a");
    let b_tip = stacked_branch(&repo, &repo_path, "b");

    let settings = settings_with(&base, &["a", "b"], SyncMode::Rebase);

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(&repo_path).unwrap();
    let result = commands::merge::run(&settings, "b");
    env::set_current_dir(original_dir).unwrap();
    result.unwrap();

    // Parent of b is a: the command checked out a and absorbed b (a
    // fast-forward here, since b descends from a)
    assert_eq!(repo.current_branch().unwrap(), "a");
    assert_eq!(repo.branch_commit_id("a").unwrap(), b_tip);

    // Merging does not close out the stack entry
    assert_eq!(settings.branches, vec!["a", "b"]);
}

#[test]
#[serial]
fn test_merge_command_rejects_unstacked_branch() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    let settings = settings_with(&base, &["a"], SyncMode::Rebase);

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(&repo_path).unwrap();
    let result = commands::merge::run(&settings, "elsewhere");
    env::set_current_dir(original_dir).unwrap();

    assert!(matches!(result.unwrap_err(), StackError::NotInStack(_)));
}

#[test]
#[serial]
fn test_push_aborts_after_first_missing_branch() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    stacked_branch(&repo, &repo_path, "a");

    let remote_dir = TempDir::new().unwrap();
    Repository::init_bare(remote_dir.path()).unwrap();
    let git_repo = Repository::open(&repo_path).unwrap();
    git_repo
        .remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    // "ghost" is stacked but was never created in git
    let settings = settings_with(&base, &["a", "ghost"], SyncMode::Rebase);

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(&repo_path).unwrap();
    let result = commands::push::run(&settings, true, false);
    env::set_current_dir(original_dir).unwrap();

    assert!(matches!(result.unwrap_err(), StackError::BranchNotFound(name) if name == "ghost"));

    // The first push completed and was not rolled back
    let remote_repo = Repository::open_bare(remote_dir.path()).unwrap();
    assert!(remote_repo.find_reference("refs/heads/a").is_ok());
    assert!(remote_repo.find_reference("refs/heads/ghost").is_err());
}

#[test]
fn test_embedded_pull_fast_forwards_then_reports_up_to_date() {
    let (_temp_dir, repo_path) = create_test_repo();
    let repo = GitRepository::open(&repo_path).unwrap();
    let base = repo.current_branch().unwrap();

    // "extra" runs ahead of the base branch
    let extra_tip = stacked_branch(&repo, &repo_path, "extra");
    repo.checkout_branch(&base).unwrap();

    let remote_dir = TempDir::new().unwrap();
    Repository::init_bare(remote_dir.path()).unwrap();
    let git_repo = Repository::open(&repo_path).unwrap();
    git_repo
        .remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();
    repo.push_branch("origin", "extra", false).unwrap();

    // Pulling origin/extra into the base fast-forwards it
    assert_eq!(
        repo.pull("origin", "extra").unwrap(),
        PullOutcome::Updated
    );
    assert_eq!(repo.branch_commit_id(&base).unwrap(), extra_tip);

    // A second pull has nothing to absorb
    assert_eq!(
        repo.pull("origin", "extra").unwrap(),
        PullOutcome::UpToDate
    );
}

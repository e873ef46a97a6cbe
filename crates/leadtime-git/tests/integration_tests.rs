//! Integration tests for leadtime-git
//!
//! These tests build real repositories with `git2` and exercise tag
//! resolution, ancestry queries, range enumeration and merge graph walks.


use chrono::DateTime;
use fixtures::{BASE_EPOCH, FixtureRepo, release_history};
use leadtime_git::{CommitRef, GitError, GitRepo, MergeGraphWalker, WalkOptions};
use similar_asserts::assert_eq;

#[test]
fn test_resolve_annotated_tag_peels_to_commit() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let tag = repo.resolve_tag("v1.0.0").expect("resolve v1.0.0");
    assert_eq!(tag.commit.sha, history.root);
    assert!(tag.annotated);
    assert_eq!(tag.date, DateTime::from_timestamp(BASE_EPOCH, 0).unwrap());
}

#[test]
fn test_resolve_lightweight_tag() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let tag = repo.resolve_tag("v1.1.0").expect("resolve v1.1.0");
    assert_eq!(tag.commit.sha, history.main2);
    assert!(!tag.annotated);
    assert_eq!(
        tag.date,
        DateTime::from_timestamp(BASE_EPOCH + 5 * 3600, 0).unwrap()
    );
}

#[test]
fn test_resolve_ref_accepts_full_ref_branch_and_sha() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    assert_eq!(
        repo.resolve_ref("refs/tags/v1.1.0").expect("full ref").sha,
        history.main2
    );
    assert_eq!(repo.resolve_ref("main").expect("branch").sha, history.main2);
    assert_eq!(
        repo.resolve_ref(&history.merge1).expect("sha").parents,
        vec![history.main1.clone(), history.feat2.clone()]
    );
}

#[test]
fn test_resolve_missing_tag_is_invalid_reference() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    match repo.resolve_tag("v9.9.9") {
        Err(GitError::InvalidReference { reference }) => assert_eq!(reference, "v9.9.9"),
        other => panic!("Expected InvalidReference, got {other:?}"),
    }
}

#[test]
fn test_find_commit_missing_sha() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let err = repo.find_commit(&"a".repeat(40)).expect_err("missing commit");
    assert!(err.is_not_found());
}

#[test]
fn test_merge_base_and_ancestry() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let base = repo
        .merge_base(&history.root, &history.main2)
        .expect("merge base")
        .expect("common ancestor");
    assert_eq!(base.sha, history.root);

    assert!(repo.is_ancestor(&history.root, &history.main2).unwrap());
    assert!(repo.is_ancestor(&history.feat1, &history.main2).unwrap());
    assert!(!repo.is_ancestor(&history.main2, &history.root).unwrap());
    assert!(!repo.is_ancestor(&history.main2, &history.main2).unwrap());
}

#[test]
fn test_merge_base_of_unrelated_histories_is_none() {
    let history = release_history();
    let orphan = history.repo.commit(&[], "Unrelated root", 10);
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let base = repo.merge_base(&orphan, &history.main2).expect("query");
    assert!(base.is_none());
}

#[test]
fn test_commits_in_range_first_parent_only() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let commits: Vec<CommitRef> = repo
        .commits_in_range("v1.0.0", "v1.1.0")
        .expect("range")
        .collect::<Result<_, _>>()
        .expect("walk range");
    let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();

    assert_eq!(
        shas,
        vec![
            history.main2.as_str(),
            history.merge1.as_str(),
            history.main1.as_str()
        ]
    );
}

#[test]
fn test_commits_in_range_is_reachable_from_to_only() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    for result in repo
        .commits_in_range(&history.feat1, &history.main2)
        .expect("range")
    {
        let commit = result.expect("commit");
        assert!(
            commit.sha == history.main2 || repo.is_ancestor(&commit.sha, &history.main2).unwrap(),
            "{} must be reachable from the range end",
            commit.short_sha()
        );
        assert!(
            commit.sha != history.feat1 && !repo.is_ancestor(&commit.sha, &history.feat1).unwrap(),
            "{} must not be reachable from the range start",
            commit.short_sha()
        );
    }
}

#[test]
fn test_commits_in_range_is_empty_for_same_endpoint() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let count = repo
        .commits_in_range("v1.1.0", "v1.1.0")
        .expect("range")
        .count();
    assert_eq!(count, 0);
}

#[test]
fn test_walker_collects_side_branch_prs() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let walker = MergeGraphWalker::new(&repo, WalkOptions::default());
    let outcome = walker
        .walk_release(&history.main2, Some(&history.root))
        .expect("walk");

    let shas: Vec<&str> = outcome.commits.iter().map(|c| c.sha.as_str()).collect();
    assert_eq!(
        shas,
        vec![
            history.main2.as_str(),
            history.merge1.as_str(),
            history.feat2.as_str(),
            history.feat1.as_str(),
            history.main1.as_str(),
        ]
    );
    assert!(outcome.boundary_reached);
    assert!(!outcome.depth_limited);

    let candidates = outcome.pr_candidates();
    let numbers: Vec<u64> = candidates.iter().map(|c| c.number).collect();
    assert_eq!(numbers, vec![13, 14, 12, 11]);
    assert_eq!(candidates[2].source_branch.as_deref(), Some("acme/parser"));
}

#[test]
fn test_walker_depth_zero_on_real_repo() {
    let history = release_history();
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    let walker = MergeGraphWalker::new(&repo, WalkOptions::default().with_max_depth(0));
    let outcome = walker
        .walk_release(&history.main2, Some(&history.root))
        .expect("walk");

    assert_eq!(outcome.commits.len(), 1);
    assert_eq!(outcome.commits[0].sha, history.main2);
    assert!(outcome.depth_limited);
}

#[test]
fn test_previous_release_tag() {
    let history = release_history();
    history.repo.tag("v1.0.1-rc.1", &history.main1);
    history.repo.tag("v0.9.0", &history.root);
    let repo = GitRepo::open(history.repo.path()).expect("open repo");

    assert_eq!(
        repo.previous_release_tag("v1.1.0").expect("tags"),
        Some("v1.0.0".to_string())
    );
    assert_eq!(repo.previous_release_tag("v1.0.0").expect("tags"), None);
}

#[test]
fn test_remote_url() {
    let repo_fixture = FixtureRepo::new();
    repo_fixture.remote("origin", "https://github.com/acme/widgets.git");
    let repo = GitRepo::open(repo_fixture.path()).expect("open repo");

    assert_eq!(
        repo.remote_url("origin"),
        Some("https://github.com/acme/widgets.git".to_string())
    );
    assert_eq!(repo.remote_url("upstream"), None);
}

#[test]
fn test_discover_from_subdirectory() {
    let history = release_history();
    let nested = history.repo.path().join("nested/dir");
    std::fs::create_dir_all(&nested).expect("create nested dir");

    let repo = GitRepo::discover(&nested).expect("discover");
    assert!(repo.path().ends_with(".git"));
}

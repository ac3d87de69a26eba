/// Tests for VisibilityDiff

use super::*;

fn pass(diff: &mut VisibilityDiff<char>, visible: &[char]) -> (Vec<char>, Vec<char>) {
    diff.begin_pass().extend(visible.iter().copied());
    let mut shown = Vec::new();
    let mut hidden = Vec::new();
    diff.commit(|key, visible| if visible { shown.push(key) } else { hidden.push(key) });
    shown.sort();
    hidden.sort();
    (shown, hidden)
}

#[test]
fn test_first_pass_shows_everything() {
    let mut diff = VisibilityDiff::new();

    let (shown, hidden) = pass(&mut diff, &['A', 'B']);

    assert_eq!(shown, vec!['A', 'B']);
    assert!(hidden.is_empty());
}

#[test]
fn test_transition_reports_only_changes() {
    let mut diff = VisibilityDiff::new();
    pass(&mut diff, &['A', 'B']);

    let (shown, hidden) = pass(&mut diff, &['B', 'C']);

    assert_eq!(shown, vec!['C']);
    assert_eq!(hidden, vec!['A']);
    assert!(diff.is_visible(&'B'));
    assert!(diff.is_visible(&'C'));
    assert!(!diff.is_visible(&'A'));
}

#[test]
fn test_repeated_pass_is_idempotent() {
    let mut diff = VisibilityDiff::new();
    pass(&mut diff, &['A', 'B']);

    let (shown, hidden) = pass(&mut diff, &['A', 'B']);

    assert!(shown.is_empty());
    assert!(hidden.is_empty());
}

#[test]
fn test_commit_returns_counts() {
    let mut diff = VisibilityDiff::new();
    diff.begin_pass().extend(['A', 'B', 'C']);
    assert_eq!(diff.commit(|_, _| {}), (3, 0));

    diff.begin_pass().insert('D');
    assert_eq!(diff.commit(|_, _| {}), (1, 3));
}

#[test]
fn test_mark_visible_seeds_previous_set() {
    let mut diff = VisibilityDiff::new();
    diff.mark_visible('A');
    diff.mark_visible('B');

    let (shown, hidden) = pass(&mut diff, &['B']);

    assert!(shown.is_empty());
    assert_eq!(hidden, vec!['A']);
}

#[test]
fn test_forget_drops_key_silently() {
    let mut diff = VisibilityDiff::new();
    pass(&mut diff, &['A', 'B']);
    diff.forget(&'A');

    let (shown, hidden) = pass(&mut diff, &['B']);

    assert!(shown.is_empty());
    assert!(hidden.is_empty());
}

#[test]
fn test_begin_pass_discards_stale_current() {
    let mut diff = VisibilityDiff::new();
    pass(&mut diff, &['A']);
    diff.begin_pass().insert('Z');

    let (shown, _) = pass(&mut diff, &['A']);

    assert!(shown.is_empty());
}

#[test]
fn test_clear() {
    let mut diff = VisibilityDiff::new();
    pass(&mut diff, &['A']);
    diff.clear();

    assert!(diff.visible().is_empty());
}

use std::sync::Arc;

use super::*;
use crate::error::GameError;
use crate::operation::CombineApplied;

fn table() -> Arc<CompositionTable> {
    Arc::new(
        CompositionTable::from_triples([
            ("闪", "门", "人"),
            ("相", "木", "目"),
            ("间", "门", "日"),
            ("便", "亻", "更"),
            ("金", "人", "王"),
            ("林", "木", "木"),
        ])
        .unwrap(),
    )
}

fn engine(seed: &[&str], targets: &[&str]) -> PuzzleEngine {
    let level = LevelDefinition::new("test")
        .with_seed(seed.iter().copied())
        .with_targets(targets.iter().copied());
    PuzzleEngine::new(table(), level, EngineConfig::default())
}

fn id_of(engine: &PuzzleEngine, glyph: &str) -> InstanceId {
    engine
        .pool()
        .entries()
        .iter()
        .find(|entry| entry.token.as_str() == glyph)
        .map(|entry| entry.id)
        .unwrap()
}

fn assert_selection_live(engine: &PuzzleEngine) {
    for &id in engine.selection().selected() {
        assert!(engine.pool().contains(id), "selected {id} is not live");
    }
}

fn split_back(engine: &mut PuzzleEngine, glyph: &str, a: &str, b: &str) {
    let id = id_of(engine, glyph);
    engine.toggle(id).unwrap();
    let SplitOutcome::Applied(applied) = engine.request_split().unwrap() else {
        panic!("split of {glyph} should apply");
    };
    assert_eq!(applied.parts(), (&Token::from(a), &Token::from(b)));
}

fn combine(engine: &mut PuzzleEngine, a: &str, b: &str) -> CombineOutcome {
    let first = id_of(engine, a);
    let second = engine
        .pool()
        .entries()
        .iter()
        .find(|entry| entry.token.as_str() == b && entry.id != first)
        .map(|entry| entry.id)
        .unwrap();
    engine.toggle(first).unwrap();
    engine.toggle(second).unwrap();
    engine.request_combine().unwrap()
}

#[test]
fn split_replaces_composite_with_its_parts() {
    let mut engine = engine(&["闪"], &[]);
    engine.set_max_selection(1);
    let source = id_of(&engine, "闪");
    engine.toggle(source).unwrap();

    let outcome = engine.commit_split(source).unwrap();

    let SplitOutcome::Applied(applied) = outcome else {
        panic!("split should apply");
    };
    assert_eq!(applied.parts(), (&Token::from("门"), &Token::from("人")));
    assert_eq!(engine.pool().count_value(&"门".into()), 1);
    assert_eq!(engine.pool().count_value(&"人".into()), 1);
    assert_eq!(engine.pool().count_value(&"闪".into()), 0);
    assert!(engine.selection().is_empty());
    assert_eq!(engine.max_selection(), 2);
}

#[test]
fn combine_of_target_waits_for_reward() {
    let mut engine = engine(&["木", "目"], &["相", "间"]);

    let outcome = combine(&mut engine, "木", "目");

    let CombineOutcome::Applied(CombineApplied {
        result, is_target, ..
    }) = outcome
    else {
        panic!("combine should apply");
    };
    assert_eq!(result, Token::from("相"));
    assert!(is_target);
    assert!(!engine.pool().contains_value(&"相".into()));
    assert!(engine.is_busy());
    assert!(engine.tracker().remaining().contains("相"));

    engine.finalize_reward(&"相".into()).unwrap();

    assert_eq!(engine.pool().count_value(&"相".into()), 1);
    assert!(engine.tracker().completed().contains("相"));
    assert!(!engine.is_busy());
}

#[test]
fn unsplittable_token_is_rejected_and_selection_cleared() {
    let mut engine = engine(&["人", "门"], &[]);
    let before = engine.pool().clone();
    let id = id_of(&engine, "人");
    engine.toggle(id).unwrap();

    let outcome = engine.request_split().unwrap();

    assert_eq!(outcome, SplitOutcome::Rejected(RejectReason::NotSplittable));
    assert!(engine.selection().is_empty());
    assert_eq!(engine.pool(), &before);
    assert_eq!(
        engine.drain_events(),
        vec![EngineEvent::OperationOutcome(CommitOutcome::Split(
            SplitOutcome::Rejected(RejectReason::NotSplittable)
        ))]
    );
}

#[test]
fn level_completes_once_after_all_rewards() {
    let mut engine = engine(
        &["人", "王", "木", "目", "亻", "更", "门", "日"],
        &["金", "相", "便", "间"],
    );

    for (a, b, result) in [
        ("人", "王", "金"),
        ("木", "目", "相"),
        ("亻", "更", "便"),
        ("门", "日", "间"),
    ] {
        assert!(!engine.is_complete());
        combine(&mut engine, a, b);
        engine.finalize_reward(&result.into()).unwrap();
    }

    assert!(engine.is_complete());
    assert_eq!(engine.progress(), 1.0);

    // Reproducing a completed target still goes through the reward path but
    // never re-triggers completion.
    split_back(&mut engine, "相", "木", "目");
    let outcome = combine(&mut engine, "木", "目");
    assert!(matches!(
        outcome,
        CombineOutcome::Applied(CombineApplied {
            is_target: true,
            ..
        })
    ));
    engine.finalize_reward(&"相".into()).unwrap();

    let completions = engine
        .drain_events()
        .into_iter()
        .filter(|event| *event == EngineEvent::LevelCompleted)
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn seed_tokens_do_not_complete_targets() {
    let engine = engine(&["相"], &["相"]);
    assert!(engine.tracker().completed().is_empty());
    assert!(!engine.is_complete());
}

#[test]
fn acquired_target_counts_without_reward_path() {
    let mut engine = engine(&[], &["相"]);
    engine.acquire("相".into());

    assert!(engine.is_complete());
    let events = engine.drain_events();
    assert!(events.contains(&EngineEvent::TargetCompleted("相".into())));
    assert_eq!(events.last(), Some(&EngineEvent::LevelCompleted));
}

#[test]
fn non_target_combine_is_added_immediately() {
    let mut engine = engine(&["木", "木"], &["相"]);

    let outcome = combine(&mut engine, "木", "木");

    assert!(matches!(
        outcome,
        CombineOutcome::Applied(CombineApplied {
            is_target: false,
            ..
        })
    ));
    assert_eq!(engine.pool().count_value(&"林".into()), 1);
    assert!(!engine.is_busy());
}

#[test]
fn combine_without_composition_is_rejected() {
    let mut engine = engine(&["木", "日"], &[]);

    let outcome = combine(&mut engine, "木", "日");

    assert_eq!(
        outcome,
        CombineOutcome::Rejected(RejectReason::NoSuchComposition)
    );
    assert!(engine.selection().is_empty());
    assert_eq!(engine.pool().len(), 2);
}

#[test]
fn wrong_selection_size_is_rejected_for_both_buttons() {
    let mut engine = engine(&["木", "目"], &[]);
    let id = id_of(&engine, "木");

    engine.toggle(id).unwrap();
    assert_eq!(
        engine.request_combine().unwrap(),
        CombineOutcome::Rejected(RejectReason::InvalidSelection)
    );
    assert!(engine.selection().is_empty());

    assert_eq!(
        engine.request_split().unwrap(),
        SplitOutcome::Rejected(RejectReason::InvalidSelection)
    );
}

#[test]
fn commit_split_requires_matching_selection() {
    let mut engine = engine(&["闪", "闪"], &[]);
    let ids: Vec<InstanceId> = engine.pool().ids().collect();
    engine.toggle(ids[0]).unwrap();

    assert_eq!(
        engine.commit_split(ids[1]).unwrap(),
        SplitOutcome::Rejected(RejectReason::InvalidSelection)
    );
    assert!(engine.selection().is_empty());
    assert_eq!(engine.pool().len(), 2);
}

#[test]
fn commits_are_refused_while_reward_pending() {
    let mut engine = engine(&["木", "目", "闪"], &["相"]);
    combine(&mut engine, "木", "目");

    let id = id_of(&engine, "闪");
    engine.toggle(id).unwrap();
    let err = engine.request_split().unwrap_err();

    assert_eq!(
        err,
        EngineError::OperationInProgress {
            pending: "相".into()
        }
    );
    assert!(err.severity().is_contract_violation());
    // The selection survives a refused commit.
    assert!(engine.selection().contains(id));
}

#[test]
fn finalize_without_pending_reward_fails_loudly() {
    let mut engine = engine(&[], &["相"]);
    let err = engine.finalize_reward(&"相".into()).unwrap_err();
    assert_eq!(err.error_code(), "ENGINE_NO_PENDING_REWARD");
}

#[test]
fn finalize_with_wrong_token_keeps_reward_pending() {
    let mut engine = engine(&["木", "目"], &["相"]);
    combine(&mut engine, "木", "目");

    let err = engine.finalize_reward(&"间".into()).unwrap_err();

    assert!(matches!(err, EngineError::RewardMismatch { .. }));
    assert!(engine.is_busy());
    assert!(engine.finalize_reward(&"相".into()).is_ok());
}

#[test]
fn removing_a_selected_instance_drops_it_from_selection() {
    let mut engine = engine(&["木", "目"], &[]);
    let id = id_of(&engine, "木");
    engine.toggle(id).unwrap();

    assert_eq!(engine.remove(id).unwrap(), Token::from("木"));
    assert!(engine.selection().is_empty());
    assert_selection_live(&engine);

    let err = engine.remove(id).unwrap_err();
    assert_eq!(err, EngineError::Pool(crate::pool::PoolError::NotFound(id)));
}

#[test]
fn selecting_dead_instances_is_a_contract_error() {
    let mut engine = engine(&["木"], &[]);
    let err = engine.toggle(InstanceId(42)).unwrap_err();
    assert_eq!(err, EngineError::UnknownInstance(InstanceId(42)));
}

#[test]
fn selection_never_exceeds_capacity() {
    let mut engine = engine(&["木", "目", "日", "门"], &[]);
    let ids: Vec<InstanceId> = engine.pool().ids().collect();
    for id in &ids {
        engine.toggle(*id).unwrap();
    }
    assert_eq!(engine.selection().len(), engine.max_selection());
    assert_eq!(engine.selection().selected(), &ids[..2]);
}

#[test]
fn selection_stays_live_across_operations() {
    let mut engine = engine(&["闪", "木", "目", "门", "日"], &["相"]);

    let id = id_of(&engine, "闪");
    engine.toggle(id).unwrap();
    engine.request_split().unwrap();
    assert_selection_live(&engine);

    combine(&mut engine, "门", "日");
    assert_selection_live(&engine);

    combine(&mut engine, "木", "目");
    assert_selection_live(&engine);
    engine.finalize_reward(&"相".into()).unwrap();
    assert_selection_live(&engine);
}

#[test]
fn split_resets_capacity_to_two() {
    let level = LevelDefinition::new("wide")
        .with_seed(["闪", "木", "目"])
        .with_max_selection(3);
    let mut engine = PuzzleEngine::new(table(), level, EngineConfig::default());
    assert_eq!(engine.max_selection(), 3);

    let id = id_of(&engine, "闪");
    engine.toggle(id).unwrap();
    engine.request_split().unwrap();

    assert_eq!(engine.max_selection(), EngineConfig::RESET_MAX_SELECTION);
}

#[test]
fn split_emits_outcome_then_pool_change() {
    let mut engine = engine(&["闪"], &[]);
    let id = id_of(&engine, "闪");
    engine.toggle(id).unwrap();
    engine.request_split().unwrap();

    let mut seen = Vec::new();
    engine.dispatch(&mut seen);

    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], EngineEvent::OperationOutcome(_)));
    let EngineEvent::PoolChanged { added, removed } = &seen[1] else {
        panic!("expected pool change");
    };
    assert_eq!(removed, &vec![id]);
    let glyphs: Vec<&str> = added.iter().map(|e| e.token.as_str()).collect();
    assert_eq!(glyphs, ["门", "人"]);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn restart_restores_seed_and_clears_pending_reward() {
    let mut engine = engine(&["木", "目"], &["相"]);
    combine(&mut engine, "木", "目");
    assert!(engine.is_busy());

    engine.restart();

    assert!(!engine.is_busy());
    assert_eq!(engine.pool().len(), 2);
    assert!(engine.tracker().completed().is_empty());
    assert!(engine.finalize_reward(&"相".into()).is_err());
}

#[test]
fn restart_emits_removals_before_fresh_seed() {
    let mut engine = engine(&["门", "人"], &["闪"]);
    let old_ids: Vec<InstanceId> = engine.pool().ids().collect();
    engine.drain_events();

    engine.restart();

    let events = engine.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        EngineEvent::PoolChanged {
            added: Vec::new(),
            removed: old_ids.clone(),
        }
    );
    match &events[1] {
        EngineEvent::PoolChanged { added, removed } => {
            assert!(removed.is_empty());
            let ids: Vec<InstanceId> = added.iter().map(|entry| entry.id).collect();
            assert_eq!(ids, old_ids);
        }
        other => panic!("expected seed additions, got {other:?}"),
    }
}

#[test]
fn snapshot_reflects_state() {
    let mut engine = engine(&["木", "目"], &["相"]);
    let id = id_of(&engine, "木");
    engine.toggle(id).unwrap();

    let snapshot = engine.snapshot();

    assert_eq!(snapshot.level, "test");
    assert_eq!(snapshot.selected, vec![id]);
    assert_eq!(snapshot.eligibility, OpEligibility::SplitEligible);
    assert_eq!(snapshot.token(id), Some(&Token::from("木")));
    assert!(snapshot.remaining_targets.contains("相"));
    assert_eq!(snapshot.pending_reward, None);
}

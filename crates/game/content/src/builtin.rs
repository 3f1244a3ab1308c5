//! The shipped campaign, embedded at compile time.
//!
//! Parsed through the regular loaders so the embedded files and on-disk data
//! directories accept exactly the same format.

use crate::loaders::{CompositionLoader, ConfigLoader, ContentBundle, LevelLoader, LoadResult};

pub const COMPOSITIONS: &str = include_str!("../data/compositions.ron");
pub const LEVELS: &str = include_str!("../data/levels.ron");
pub const CONFIG: &str = include_str!("../data/config.toml");

/// Parses the embedded composition table, levels and configuration.
pub fn bundle() -> LoadResult<ContentBundle> {
    Ok(ContentBundle {
        table: CompositionLoader::parse(COMPOSITIONS)?,
        catalog: LevelLoader::parse(LEVELS)?,
        config: ConfigLoader::parse(CONFIG)?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glyph_core::{CombineOutcome, EngineConfig, InstanceId, PuzzleEngine, Token};

    use super::*;

    #[test]
    fn builtin_bundle_parses() {
        let bundle = bundle().unwrap();
        assert!(!bundle.table.is_empty());
        assert_eq!(bundle.catalog.len(), 3);
        assert_eq!(bundle.config, EngineConfig::default());
    }

    #[test]
    fn every_level_target_is_composable() {
        let bundle = bundle().unwrap();
        for level in bundle.catalog.iter() {
            for target in &level.targets {
                assert!(
                    bundle.table.is_splittable(target),
                    "{target} in {} has no composition",
                    level.name
                );
            }
        }
    }

    fn pick(engine: &PuzzleEngine, glyph: &str, skip: usize) -> InstanceId {
        engine
            .pool()
            .entries()
            .iter()
            .filter(|entry| entry.token.as_str() == glyph)
            .nth(skip)
            .map(|entry| entry.id)
            .unwrap()
    }

    fn split(engine: &mut PuzzleEngine, glyph: &str) {
        let id = pick(engine, glyph, 0);
        engine.toggle(id).unwrap();
        assert!(engine.request_split().unwrap().is_applied(), "split {glyph}");
    }

    fn combine(engine: &mut PuzzleEngine, a: &str, b: &str) {
        let first = pick(engine, a, 0);
        let second = pick(engine, b, usize::from(a == b));
        engine.toggle(first).unwrap();
        engine.toggle(second).unwrap();
        let outcome = engine.request_combine().unwrap();
        assert!(outcome.is_applied(), "combine {a}+{b}");
        if let CombineOutcome::Applied(applied) = outcome
            && applied.is_target
        {
            engine.finalize_reward(&applied.result).unwrap();
        }
    }

    #[test]
    fn four_keys_level_is_solvable() {
        let bundle = bundle().unwrap();
        let level = bundle.catalog.get(2).unwrap().clone();
        assert_eq!(level.targets.len(), 4);
        let pickups: Vec<Token> = level.pickups.clone();
        let mut engine = PuzzleEngine::new(Arc::new(bundle.table), level, bundle.config);

        for token in pickups {
            engine.acquire(token);
        }
        split(&mut engine, "闪");
        combine(&mut engine, "人", "王");
        combine(&mut engine, "门", "日");
        split(&mut engine, "相");
        combine(&mut engine, "木", "目");
        split(&mut engine, "便");
        combine(&mut engine, "亻", "更");

        assert!(engine.is_complete());
        assert_eq!(engine.progress(), 1.0);
    }
}

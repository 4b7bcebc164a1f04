//! Blending and publication tests for the `moodmix-rooms` crate.

use std::sync::Arc;

use async_trait::async_trait;
use moodmix_rooms::{
    policy_key, BlendError, CacheError, EmotionTable, MemoryPolicyCache, PolicyCache,
    RoomBlender, RoomPolicy, UserEmotion, MISSING_INPUT_MESSAGE,
};

type TestResult<T = ()> = anyhow::Result<T>;

struct UnreachableCache;

#[async_trait]
impl PolicyCache for UnreachableCache {
    async fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

fn blender_with_memory_cache() -> (RoomBlender, MemoryPolicyCache) {
    let cache = MemoryPolicyCache::new();
    let blender = RoomBlender::new(EmotionTable::default(), Some(Arc::new(cache.clone())));
    (blender, cache)
}

fn entries(pairs: &[(&str, &str)]) -> Vec<UserEmotion> {
    pairs
        .iter()
        .map(|(user, emotion)| UserEmotion::new(*user, *emotion))
        .collect()
}

#[tokio::test]
async fn blend_publishes_policy_under_room_key() -> TestResult {
    let (blender, cache) = blender_with_memory_cache();

    let outcome = blender
        .blend("room_001", &entries(&[("u1", "happy"), ("u2", "sad")]))
        .await?;

    assert_eq!(outcome.room_id, "room_001");
    assert_eq!(
        outcome.policy,
        RoomPolicy {
            valence: 0.55,
            tempo: 0.55,
            count: 2
        }
    );
    assert!(outcome.published);
    assert_eq!(
        cache.get(&policy_key("room_001")).await?.as_deref(),
        Some(r#"{"valence":0.55,"tempo":0.55,"count":2}"#)
    );
    Ok(())
}

#[tokio::test]
async fn blend_is_order_independent() -> TestResult {
    let (blender, _cache) = blender_with_memory_cache();

    let forward = blender
        .blend("room_001", &entries(&[("u1", "happy"), ("u2", "sad")]))
        .await?;
    let backward = blender
        .blend("room_001", &entries(&[("u2", "sad"), ("u1", "happy")]))
        .await?;

    assert_eq!(forward, backward);
    Ok(())
}

#[tokio::test]
async fn unknown_emotions_are_excluded_from_average_and_count() -> TestResult {
    let (blender, _cache) = blender_with_memory_cache();

    let with_unknown = blender
        .blend("room_001", &entries(&[("u1", "happy"), ("u2", "xyz")]))
        .await?;
    let alone = blender
        .blend("room_001", &entries(&[("u1", "happy")]))
        .await?;

    assert_eq!(with_unknown.policy, alone.policy);
    assert_eq!(with_unknown.policy.count, 1);
    Ok(())
}

#[tokio::test]
async fn rejected_inputs_never_touch_the_cache() -> TestResult {
    let (blender, cache) = blender_with_memory_cache();

    let empty = blender.blend("room_001", &[]).await;
    assert_eq!(empty, Err(BlendError::validation(MISSING_INPUT_MESSAGE)));

    let no_room = blender.blend("  ", &entries(&[("u1", "happy")])).await;
    assert!(matches!(no_room, Err(BlendError::Validation { .. })));

    let unknown_only = blender.blend("room_001", &entries(&[("u1", "xyz")])).await;
    assert_eq!(unknown_only, Err(BlendError::NoValidInput));

    assert!(cache.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn latest_blend_replaces_previous_policy() -> TestResult {
    let (blender, cache) = blender_with_memory_cache();

    blender
        .blend("room_001", &entries(&[("u1", "happy"), ("u2", "happy")]))
        .await?;
    blender
        .blend("room_001", &entries(&[("u3", "tired")]))
        .await?;

    assert_eq!(cache.len().await, 1);
    assert_eq!(
        blender.published_policy("room_001").await?,
        Some(RoomPolicy {
            valence: 0.4,
            tempo: 0.3,
            count: 1
        })
    );
    Ok(())
}

#[tokio::test]
async fn rooms_are_published_independently() -> TestResult {
    let (blender, cache) = blender_with_memory_cache();

    blender.blend("room_a", &entries(&[("u1", "angry")])).await?;
    blender.blend("room_b", &entries(&[("u2", "relaxed")])).await?;

    assert_eq!(cache.len().await, 2);
    assert_eq!(
        blender.published_policy("room_a").await?.map(|p| p.tempo),
        Some(0.9)
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_cache_still_returns_policy() -> TestResult {
    let blender = RoomBlender::new(EmotionTable::default(), Some(Arc::new(UnreachableCache)));

    let outcome = blender
        .blend("room_001", &entries(&[("u1", "hopeful")]))
        .await?;

    assert!(!outcome.published);
    assert_eq!(outcome.policy.valence, 0.8);
    assert!(blender.published_policy("room_001").await.is_err());
    Ok(())
}

#[tokio::test]
async fn missing_cache_still_returns_policy() -> TestResult {
    let blender = RoomBlender::default();

    let outcome = blender.blend("room_001", &entries(&[("u1", "sad")])).await?;

    assert!(!blender.has_cache());
    assert!(!outcome.published);
    assert_eq!(outcome.policy.count, 1);
    assert!(blender.published_policy("room_001").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn outcome_serialises_without_publication_flag() -> TestResult {
    let blender = RoomBlender::default();
    let outcome = blender.blend("room_001", &entries(&[("u1", "happy")])).await?;

    let value = serde_json::to_value(&outcome)?;
    assert_eq!(
        value,
        serde_json::json!({
            "roomId": "room_001",
            "policy": {"valence": 0.9, "tempo": 0.8, "count": 1}
        })
    );
    Ok(())
}

#[tokio::test]
async fn blend_publishes_tied_means_rounded_to_even() -> TestResult {
    let (blender, cache) = blender_with_memory_cache();
    let mut moods = vec![("u0", "sad")];
    moods.extend(std::iter::repeat(("u1", "happy")).take(7));

    let outcome = blender.blend("room_ties", &entries(&moods)).await?;

    assert_eq!(outcome.policy.valence, 0.812);
    assert_eq!(
        cache.get(&policy_key("room_ties")).await?.as_deref(),
        Some(r#"{"valence":0.812,"tempo":0.738,"count":8}"#)
    );
    Ok(())
}

#[tokio::test]
async fn blend_accepts_whitespace_room_id_but_not_empty() -> TestResult {
    let (blender, cache) = blender_with_memory_cache();

    let outcome = blender.blend(" ", &entries(&[("u1", "happy")])).await?;
    assert!(outcome.published);
    assert!(cache.get(&policy_key(" ")).await?.is_some());

    let rejected = blender.blend("", &entries(&[("u1", "happy")])).await;
    assert_eq!(
        rejected.err(),
        Some(BlendError::validation(MISSING_INPUT_MESSAGE))
    );
    Ok(())
}

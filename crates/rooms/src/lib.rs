//! # Moodmix Rooms
//!
//! Blends the moods of everyone in a room into one playback policy and
//! publishes it to a shared cache under `room:{roomId}:policy`.
//!
//! ```
//! use moodmix_rooms::{compute_policy, EmotionTable, UserEmotion};
//!
//! let policy = compute_policy(
//!     &EmotionTable::default(),
//!     &[UserEmotion::new("u1", "happy"), UserEmotion::new("u2", "sad")],
//! )
//! .unwrap();
//! assert_eq!((policy.valence, policy.tempo, policy.count), (0.55, 0.55, 2));
//! ```

pub mod blend;
pub mod cache;
pub mod emotion;
pub mod errors;
pub mod policy;
pub mod registry;

pub use blend::{compute_policy, BlendOutcome, RoomBlender, UserEmotion, MISSING_INPUT_MESSAGE};
pub use cache::{MemoryPolicyCache, PolicyCache, RedisPolicyCache};
pub use emotion::{normalize_emotion, EmotionProfile, EmotionTable};
pub use errors::{BlendError, CacheError, RoomError};
pub use policy::{policy_key, PlaybackTargets, RoomPolicy};
pub use registry::{RoomRegistry, RoomSnapshot, DEFAULT_MEMBER_EMOTION};

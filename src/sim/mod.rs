//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and sequence
//! of `(now_ms, TickInput)` a session evolves identically:
//! - Seeded RNG only
//! - Stable iteration order (registration order of each collection)
//! - No rendering or audio backends; those are traits implemented by the host

pub mod animation;
pub mod bounds;
pub mod bullet;
pub mod enemy;
pub mod player;
pub mod pool;
pub mod session;
pub mod tick;

pub use animation::{Animation, AnimationConfig, AnimationFrame, PlaybackState};
pub use bounds::Bounds;
pub use bullet::{Bullet, BulletOwner};
pub use enemy::{Enemy, EnemyKind, HitOutcome};
pub use player::Player;
pub use pool::{Pool, PoolTag, Recyclable};
pub use session::{EntityId, GameEvent, Session};
pub use tick::{Game, ManualScheduler, TickCues, TickInput, TickScheduler, tick};

//! Object recycling
//!
//! Destroyed entities are parked in per-tag FIFO buckets and handed back out
//! instead of being reallocated. Each entity kind gets its own `Pool<T>`; the
//! tag splits a kind further (player vs enemy bullets share a type but not a
//! bucket).

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

/// Bucket identifier inside a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PoolTag {
    Enemy,
    PlayerBullet,
    EnemyBullet,
}

impl PoolTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolTag::Enemy => "enemy",
            PoolTag::PlayerBullet => "bullet",
            PoolTag::EnemyBullet => "enemyBullet",
        }
    }
}

/// Lifecycle hooks for pooled entities
///
/// `destroy` must leave the value hidden and inert. `init` must overwrite
/// every piece of per-use state so a recycled value is indistinguishable
/// from a freshly built one.
pub trait Recyclable {
    /// Arguments needed to bring a value into play
    type Init<'a>;

    fn init(&mut self, args: Self::Init<'_>);
    fn destroy(&mut self);
}

/// Typed recycler with one FIFO bucket per tag
#[derive(Debug, Clone)]
pub struct Pool<T> {
    buckets: BTreeMap<PoolTag, VecDeque<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Number of parked values for a tag
    pub fn size(&self, tag: PoolTag) -> usize {
        self.buckets.get(&tag).map_or(0, VecDeque::len)
    }

    /// Drop every parked value for a tag
    pub fn clear(&mut self, tag: PoolTag) {
        if let Some(bucket) = self.buckets.get_mut(&tag) {
            bucket.clear();
        }
    }

    /// Drop every bucket
    pub fn clear_all(&mut self) {
        self.buckets.clear();
    }

    /// Tags that have been used with this pool
    pub fn tags(&self) -> Vec<PoolTag> {
        self.buckets.keys().copied().collect()
    }

    /// Parked count per tag
    pub fn stats(&self) -> Vec<(PoolTag, usize)> {
        self.buckets
            .iter()
            .map(|(tag, bucket)| (*tag, bucket.len()))
            .collect()
    }

    /// Take the least-recently recovered value for a tag, if any
    pub fn get_item(&mut self, tag: PoolTag) -> Option<T> {
        self.buckets.get_mut(&tag)?.pop_front()
    }
}

impl<T: Recyclable> Pool<T> {
    /// Destroy a value and park it at the back of its bucket
    ///
    /// The caller must already have removed the value from every active
    /// collection; taking it by value enforces that.
    pub fn recover(&mut self, tag: PoolTag, mut item: T) {
        item.destroy();
        self.buckets.entry(tag).or_default().push_back(item);
    }

    /// Reuse a parked value or build one, then initialise it
    pub fn get_item_with_factory(
        &mut self,
        tag: PoolTag,
        factory: impl FnOnce() -> T,
        args: T::Init<'_>,
    ) -> T {
        let mut item = self.get_item(tag).unwrap_or_else(factory);
        item.init(args);
        item
    }

    /// Park `count` freshly built, destroyed values ahead of play
    pub fn pre_warm(&mut self, tag: PoolTag, mut factory: impl FnMut() -> T, count: usize) {
        let bucket = self.buckets.entry(tag).or_default();
        bucket.reserve(count);
        for _ in 0..count {
            let mut item = factory();
            item.destroy();
            bucket.push_back(item);
        }
        log::info!("Pre-warmed {} `{}` entries", count, tag.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Probe {
        label: &'static str,
        value: u32,
        alive: bool,
        destroyed: u32,
    }

    impl Probe {
        fn labelled(label: &'static str) -> Self {
            Self {
                label,
                alive: true,
                ..Default::default()
            }
        }
    }

    impl Recyclable for Probe {
        type Init<'a> = u32;

        fn init(&mut self, value: u32) {
            self.value = value;
            self.alive = true;
        }

        fn destroy(&mut self) {
            self.alive = false;
            self.value = 0;
            self.destroyed += 1;
        }
    }

    #[test]
    fn test_fifo_reuse_order() {
        let mut pool = Pool::new();
        pool.recover(PoolTag::Enemy, Probe::labelled("a"));
        pool.recover(PoolTag::Enemy, Probe::labelled("b"));

        let first = pool.get_item(PoolTag::Enemy).unwrap();
        let second = pool.get_item(PoolTag::Enemy).unwrap();
        assert_eq!(first.label, "a");
        assert_eq!(second.label, "b");
        assert!(!first.alive && first.destroyed == 1);
        assert!(!second.alive && second.destroyed == 1);
        assert!(pool.get_item(PoolTag::Enemy).is_none());
    }

    #[test]
    fn test_tags_are_separate_buckets() {
        let mut pool = Pool::new();
        pool.recover(PoolTag::PlayerBullet, Probe::labelled("player"));
        assert!(pool.get_item(PoolTag::EnemyBullet).is_none());
        assert_eq!(pool.size(PoolTag::PlayerBullet), 1);
    }

    #[test]
    fn test_factory_fallback_and_init() {
        let mut pool: Pool<Probe> = Pool::new();
        let built = pool.get_item_with_factory(PoolTag::Enemy, || Probe::labelled("fresh"), 7);
        assert_eq!(built.label, "fresh");
        assert_eq!(built.value, 7);
        assert!(built.alive);
    }

    #[test]
    fn test_recycled_item_is_reinitialised() {
        let mut pool = Pool::new();
        let mut used = Probe::labelled("used");
        used.value = 99;
        pool.recover(PoolTag::Enemy, used);

        let item = pool.get_item_with_factory(PoolTag::Enemy, || Probe::labelled("fresh"), 3);
        assert_eq!(item.label, "used");
        assert_eq!(item.value, 3);
        assert!(item.alive);
        assert_eq!(pool.size(PoolTag::Enemy), 0);
    }

    #[test]
    fn test_pre_warm_parks_destroyed_items() {
        let mut pool = Pool::new();
        pool.pre_warm(PoolTag::EnemyBullet, || Probe::labelled("warm"), 4);
        assert_eq!(pool.size(PoolTag::EnemyBullet), 4);
        let item = pool.get_item(PoolTag::EnemyBullet).unwrap();
        assert!(!item.alive);
        assert_eq!(item.destroyed, 1);
    }

    #[test]
    fn test_clear_and_stats() {
        let mut pool = Pool::new();
        pool.pre_warm(PoolTag::Enemy, Probe::default, 2);
        pool.pre_warm(PoolTag::PlayerBullet, Probe::default, 3);
        assert_eq!(
            pool.stats(),
            vec![(PoolTag::Enemy, 2), (PoolTag::PlayerBullet, 3)]
        );

        pool.clear(PoolTag::Enemy);
        assert_eq!(pool.size(PoolTag::Enemy), 0);
        assert_eq!(pool.tags(), vec![PoolTag::Enemy, PoolTag::PlayerBullet]);

        pool.clear_all();
        assert!(pool.tags().is_empty());
    }
}

//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront reducers.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{test_clock, SequentialIdGenerator};
//!
//! let env = StorefrontEnvironment::new(
//!     test_clock(),
//!     SequentialIdGenerator::new("ORDER"),
//!     StorefrontConfig::default(),
//! );
//! ```

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicU64, Ordering};
use storefront_core::environment::{Clock, IdGenerator};


/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{
        AtomicU64, Clock, DateTime, IdGenerator, Mutex, Ordering, PoisonError, Utc, VecDeque,
    };

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }

    /// Predictable identifiers: `PREFIX-1`, `PREFIX-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::SequentialIdGenerator;
    /// use storefront_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("ORDER");
    /// assert_eq!(ids.next_id(), "ORDER-1");
    /// assert_eq!(ids.next_id(), "ORDER-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator with the given prefix, starting at 1
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }

    /// Replays a fixed script of identifiers, then falls back to a sequence.
    ///
    /// Used to force identifier collisions.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::ScriptedIdGenerator;
    /// use storefront_core::environment::IdGenerator;
    ///
    /// let ids = ScriptedIdGenerator::new(["A", "A"]);
    /// assert_eq!(ids.next_id(), "A");
    /// assert_eq!(ids.next_id(), "A");
    /// assert_eq!(ids.next_id(), "SCRIPT-1");
    /// ```
    #[derive(Debug)]
    pub struct ScriptedIdGenerator {
        script: Mutex<VecDeque<String>>,
        fallback: SequentialIdGenerator,
    }

    impl ScriptedIdGenerator {
        /// Create a generator replaying `ids` in order
        #[must_use]
        pub fn new<I, T>(ids: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Into<String>,
        {
            Self {
                script: Mutex::new(ids.into_iter().map(Into::into).collect()),
                fallback: SequentialIdGenerator::new("SCRIPT"),
            }
        }
    }

    impl IdGenerator for ScriptedIdGenerator {
        fn next_id(&self) -> String {
            let scripted = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            scripted.unwrap_or_else(|| self.fallback.next_id())
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ScriptedIdGenerator, SequentialIdGenerator, test_clock};
pub use reducer_test::{ReducerTest, assertions};

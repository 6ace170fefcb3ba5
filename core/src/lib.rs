//! # Storefront Core
//!
//! Core traits and types for the storefront lifecycle.
//!
//! Every piece of storefront behaviour (cart, notifications, checkout,
//! payment, order history) is written as a reducer over owned state. The
//! runtime crate owns the state and executes the effects reducers describe.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and facts)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution), including cancellable timers
//! - **Environment**: Injected dependencies via traits (`Clock`, `IdGenerator`)
//!
//! ## Example
//!
//! ```
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct BadgeState {
//!     items: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum BadgeAction {
//!     Added,
//! }
//!
//! struct BadgeReducer;
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BadgeState,
//!         action: BadgeAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<BadgeAction>; 4]> {
//!         match action {
//!             BadgeAction::Added => state.items += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = BadgeState::default();
//! let _ = BadgeReducer.reduce(&mut state, BadgeAction::Added, &());
//! assert_eq!(state.items, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// Reducers never fail. Inputs that make no sense for the current state
    /// are absorbed and the reducer returns `Effect::None`.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Names a cancellation slot.
    ///
    /// At most one effect runs per id. Starting a new
    /// [`Effect::Cancellable`] with a live id aborts the running one first.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Creates a new effect id
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// Returns the slot name
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl fmt::Display for EffectId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for expiries and presentation delays)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` in the cancellation slot `id`, superseding whatever
        /// currently runs there
        Cancellable {
            /// Slot the effect occupies while running
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },

        /// Abort the effect running in the given slot, if any
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Place this effect in a cancellation slot
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Transform the actions this effect produces.
        ///
        /// Used to lift a child reducer's effects into its parent's action type.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: Fn(Action) -> B + Clone + Send + Sync + 'static,
            Action: Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(f.clone())).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(f.clone())).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
                Effect::Cancellable { id, effect } => Effect::Cancellable {
                    id,
                    effect: Box::new(effect.map(f)),
                },
                Effect::Cancel(id) => Effect::Cancel(id),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism (wall clock, random identifiers) are
/// abstracted behind traits and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use rand::Rng;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of opaque identifiers
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        fn next_id(&self) -> String;
    }

    const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Random uppercase base-36 codes (e.g. `K3J9QZ0AB`)
    ///
    /// Not predictable across calls; uniqueness within a session is
    /// checked by the caller.
    #[derive(Debug, Clone, Copy)]
    pub struct RandomIdGenerator {
        length: usize,
    }

    impl RandomIdGenerator {
        /// Default code length
        pub const DEFAULT_LENGTH: usize = 9;

        /// Create a generator emitting codes of `length` characters (at least 1)
        #[must_use]
        pub fn new(length: usize) -> Self {
            Self {
                length: length.max(1),
            }
        }

        /// Length of generated codes
        #[must_use]
        pub const fn length(&self) -> usize {
            self.length
        }
    }

    impl Default for RandomIdGenerator {
        fn default() -> Self {
            Self::new(Self::DEFAULT_LENGTH)
        }
    }

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> String {
            let mut rng = rand::thread_rng();
            (0..self.length)
                .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::{Effect, EffectId};
    use super::environment::{IdGenerator, RandomIdGenerator};
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum Child {
        Tick,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Parent {
        Child(Child),
    }

    const SLOT: EffectId = EffectId::new("slot");

    #[test]
    fn test_random_ids_have_requested_shape() {
        let generator = RandomIdGenerator::new(12);
        let id = generator.next_id();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_random_ids_are_not_repeated() {
        let generator = RandomIdGenerator::default();
        let first = generator.next_id();
        let second = generator.next_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_zero_length_is_clamped() {
        assert_eq!(RandomIdGenerator::new(0).length(), 1);
    }

    #[test]
    fn test_map_delay_inside_cancellable() {
        let effect = Effect::Delay {
            duration: Duration::from_secs(3),
            action: Box::new(Child::Tick),
        }
        .cancellable(SLOT);

        match effect.map(Parent::Child) {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, SLOT);
                assert!(matches!(
                    *effect,
                    Effect::Delay { ref action, .. } if **action == Parent::Child(Child::Tick)
                ));
            },
            other => unreachable!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_map_future() {
        let effect: Effect<Child> = Effect::Future(Box::pin(async { Some(Child::Tick) }));
        let Effect::Future(fut) = effect.map(Parent::Child) else {
            unreachable!("map keeps the variant");
        };
        assert_eq!(
            futures::executor::block_on(fut),
            Some(Parent::Child(Child::Tick))
        );
    }

    #[test]
    fn test_map_preserves_cancel() {
        let effect: Effect<Child> = Effect::Cancel(SLOT);
        assert!(matches!(effect.map(Parent::Child), Effect::Cancel(id) if id == SLOT));
    }
}

//! Reducer composition utilities
//!
//! A feature reducer is written against its own state, action and
//! environment. [`scope_reducer`] lifts it into a parent reducer:
//!
//! - a state lens selects the child's slice of parent state
//! - an action prism extracts child actions and embeds child effects back
//! - an environment lens selects the child's dependencies
//!
//! # Example
//!
//! ```
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//! use storefront_core::composition::scope_reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     counter: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Counter(CounterAction),
//! }
//!
//! let scoped = scope_reducer(
//!     CounterReducer,
//!     |app: &mut AppState| &mut app.counter,
//!     |action: AppAction| match action {
//!         AppAction::Counter(a) => Some(a),
//!     },
//!     AppAction::Counter,
//!     |_: &()| &(),
//! );
//!
//! let mut state = AppState::default();
//! let _ = scoped.reduce(&mut state, AppAction::Counter(CounterAction::Increment), &());
//! assert_eq!(state.counter.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Scopes a reducer to operate on a slice of a larger state.
///
/// Parent actions that `extract` does not recognise are ignored and produce
/// no effects. Effects returned by the child are mapped through `embed`.
///
/// # Type Parameters
///
/// - `S`, `A`, `E`: parent state, action and environment
/// - `R`: child reducer
pub fn scope_reducer<S, A, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
) -> ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        environment,
    }
}

/// A reducer lifted into a parent domain.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
}

impl<S, A, E, R> ScopedReducer<S, A, E, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: Send + 'static,
{
    /// Run the child reducer with an action already in the child's type.
    ///
    /// Lets a parent feed a child directly, e.g. when one feature observes
    /// another's mutations.
    pub fn reduce_child(
        &self,
        state: &mut S,
        action: R::Action,
        env: &E,
    ) -> SmallVec<[Effect<A>; 4]> {
        let child_state = (self.state)(state);
        let child_env = (self.environment)(env);
        let embed = self.embed;

        self.reducer
            .reduce(child_state, action, child_env)
            .into_iter()
            .filter(|effect| !effect.is_none())
            .map(|effect| effect.map(embed))
            .collect()
    }

    /// The wrapped child reducer
    pub const fn inner(&self) -> &R {
        &self.reducer
    }
}

impl<S, A, E, R> Reducer for ScopedReducer<S, A, E, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match (self.extract)(action) {
            Some(child_action) => self.reduce_child(state, child_action, env),
            None => SmallVec::new(),
        }
    }
}

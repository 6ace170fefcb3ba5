//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when reducers describe deferred work.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust
/// use storefront_core::async_effect;
///
/// #[derive(Clone, Debug)]
/// enum Action {
///     Placed,
/// }
///
/// let effect = async_effect! {
///     Some(Action::Placed)
/// };
/// # let _ = effect;
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(::std::boxed::Box::pin(async move { $($body)* }))
    };
}

/// Create an `Effect::Delay`
///
/// # Example
///
/// ```rust
/// use storefront_core::delay;
/// use std::time::Duration;
///
/// #[derive(Clone, Debug)]
/// enum Action {
///     Expired,
/// }
///
/// let effect = delay! {
///     duration: Duration::from_secs(3),
///     action: Action::Expired
/// };
/// # let _ = effect;
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Cancellable` wrapping another effect
///
/// # Example
///
/// ```rust
/// use storefront_core::{cancellable, delay, effect::EffectId};
/// use std::time::Duration;
///
/// #[derive(Clone, Debug)]
/// enum Action {
///     Expired,
/// }
///
/// const TIMER: EffectId = EffectId::new("timer");
///
/// let effect = cancellable! {
///     id: TIMER,
///     effect: delay! {
///         duration: Duration::from_secs(3),
///         action: Action::Expired
///     }
/// };
/// # let _ = effect;
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        effect: $effect:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($effect),
        }
    };
}

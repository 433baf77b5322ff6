//! # Registry Core
//!
//! Core traits and types behind the taxpayer registry controller.
//!
//! The controller is written as a reducer: a function that takes the current
//! state and an action, updates the state in place, and returns descriptions of
//! the side effects (remote calls) to run next. The runtime crate executes those
//! effects and feeds their results back in as new actions.
//!
//! ## Core Concepts
//!
//! - **State**: everything the view renders (records, flags, form, search, table)
//! - **Action**: user intents and remote-call results
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a side effect description, not its execution
//! - **Environment**: injected dependencies (the record client, policies)
//!
//! ## Example
//!
//! ```
//! use registry_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct LoadingState {
//!     is_loading: bool,
//! }
//!
//! enum LoadingAction {
//!     Start,
//!     Finished,
//! }
//!
//! struct LoadingReducer;
//!
//! impl Reducer for LoadingReducer {
//!     type State = LoadingState;
//!     type Action = LoadingAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut LoadingState,
//!         action: LoadingAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<LoadingAction>; 4]> {
//!         match action {
//!             LoadingAction::Start => {
//!                 state.is_loading = true;
//!                 smallvec![Effect::future(async { Some(LoadingAction::Finished) })]
//!             },
//!             LoadingAction::Finished => {
//!                 state.is_loading = false;
//!                 SmallVec::new()
//!             },
//!         }
//!     }
//! }
//!
//! let mut state = LoadingState::default();
//! let effects = LoadingReducer.reduce(&mut state, LoadingAction::Start, &());
//! assert!(state.is_loading);
//! assert_eq!(effects.len(), 1);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the trait every controller implements
pub mod reducer {
    use super::{effect::Effect, SmallVec};

    /// The Reducer trait - state transitions plus effect descriptions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer owns
    /// - `Action`: Everything that can happen to that state
    /// - `Environment`: The injected dependencies effects are built from
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns the effects to execute. Must not
        /// perform I/O itself: remote calls are returned as [`Effect::Future`].
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned by reducers. They are executed by the store,
/// never by the reducer itself.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type effects feed back into the reducer
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// If the future yields `Some(action)`, the action is fed back into the
        /// reducer once it resolves.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a future as an effect
        pub fn future<F>(future: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(future))
        }

        /// Combine effects to run concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

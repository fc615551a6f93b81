//! Client-held stores: cart and wishlist.
//!
//! # Architecture
//!
//! Each store is a pure reducer `(state, action) -> state` plus a shared
//! dispatcher, [`Store`]. The dispatcher owns the current immutable snapshot,
//! swaps in the reducer's result, and then runs the post-commit hooks.
//! Commits are serialized, so hooks observe states in commit order and the
//! last snapshot written is always the current state. Readers are not blocked
//! while hooks run. Write-through persistence is one of those hooks, so the
//! reducers themselves never see storage.
//!
//! ```rust,ignore
//! let persistence = PersistenceAdapter::new(FileStore::open(".satwa")?);
//! let cart = CartStore::load(persistence.clone());
//! cart.add_item(&product, 2);
//! assert_eq!(cart.cart_count(), 2);
//! ```

pub mod cart;
pub mod wishlist;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::persistence::PersistenceAdapter;

pub use cart::{CartAction, CartReducer, CartState, CartStore};
pub use wishlist::{WishlistAction, WishlistReducer, WishlistState, WishlistStore};

/// A pure state transition function with a persisted snapshot form.
pub trait Reducer: 'static {
    /// In-memory state. Serialized as-is when persisted.
    type State: Default + Serialize + Send + Sync;
    /// Mutations understood by the reducer.
    type Action: fmt::Debug;
    /// Shape read back from storage before validation.
    type Snapshot: DeserializeOwned;

    /// Storage namespace for this store's snapshot.
    const NAMESPACE: &'static str;

    /// Apply `action`. Returns `None` when the action changes nothing.
    fn reduce(state: &Self::State, action: Self::Action) -> Option<Self::State>;

    /// Rebuild a state from a stored snapshot, repairing invariant violations.
    fn restore(snapshot: Self::Snapshot) -> Self::State;
}

type CommitHook<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Dispatcher holding the current state of one reducer.
///
/// Cheap to clone; clones share state and hooks.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

struct StoreInner<R: Reducer> {
    /// Held from reduce through the last hook of a commit.
    commit: Mutex<()>,
    state: RwLock<Arc<R::State>>,
    hooks: RwLock<Vec<CommitHook<R::State>>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> fmt::Debug for Store<R>
where
    R::State: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("namespace", &R::NAMESPACE)
            .field("state", &self.state())
            .finish()
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::with_state(R::State::default())
    }
}

impl<R: Reducer> Store<R> {
    /// Store with no persistence, starting from `state`.
    #[must_use]
    pub fn with_state(state: R::State) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                commit: Mutex::new(()),
                state: RwLock::new(Arc::new(state)),
                hooks: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Initialise from the persisted snapshot and write every commit back.
    ///
    /// A missing or unreadable snapshot yields the default (empty) state.
    #[must_use]
    pub fn load(persistence: PersistenceAdapter) -> Self {
        let state = persistence
            .load::<R::Snapshot>(R::NAMESPACE)
            .map(R::restore)
            .unwrap_or_default();

        let store = Self::with_state(state);
        store.on_commit(move |state: &R::State| {
            if let Err(e) = persistence.save(R::NAMESPACE, state) {
                tracing::warn!(
                    namespace = R::NAMESPACE,
                    error = %e,
                    "Snapshot write failed; change kept in memory only"
                );
            }
        });
        store
    }

    /// Register a hook run after every committed change.
    ///
    /// Hooks run in commit order and must not dispatch to the same store.
    pub fn on_commit(&self, hook: impl Fn(&R::State) + Send + Sync + 'static) {
        self.inner
            .hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
    }

    /// Current immutable snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<R::State> {
        Arc::clone(&self.inner.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Apply an action. Returns whether the state changed.
    ///
    /// Hooks run only when the state changed, after the new state is visible.
    pub fn dispatch(&self, action: R::Action) -> bool {
        tracing::trace!(namespace = R::NAMESPACE, ?action, "Dispatch");

        let _commit = self
            .inner
            .commit
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let committed = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let Some(next) = R::reduce(&guard, action) else {
                return false;
            };
            *guard = Arc::new(next);
            Arc::clone(&guard)
        };

        let hooks = self
            .inner
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for hook in hooks.iter() {
            hook(&committed);
        }
        true
    }
}

//! Reducer store
//!
//! Holds a state value that only changes through `dispatch`, and notifies
//! subscribers after every change. Used to keep HUD text in sync with the
//! score without the engine knowing anything about the HUD.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(&S)>;

pub struct Store<S, A> {
    state: S,
    reducer: fn(S, &A) -> S,
    subscriptions: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl<S: Clone, A> Store<S, A> {
    pub fn new(state: S, reducer: fn(S, &A) -> S) -> Self {
        Self {
            state,
            reducer,
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn dispatch(&mut self, action: &A) {
        self.state = (self.reducer)(self.state.clone(), action);
        for (_, listener) in &mut self.subscriptions {
            listener(&self.state);
        }
    }

    /// Register a listener called with the new state after each dispatch.
    pub fn subscribe(&mut self, listener: impl FnMut(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(i, _)| *i != id);
        self.subscriptions.len() != before
    }

    /// Replace the state without notifying anyone.
    pub fn reset(&mut self, state: S) {
        self.state = state;
    }
}

//! A value computed once, on first access, from any number of threads.
//!
//! `LazyRef` is used to defer building a model until something asks for it.
//! Unlike `OnceLock`, the cell can be reset by a panicking initializer (the
//! next caller retries) and its value can be atomically replaced afterwards.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

enum State<T> {
    Uninitialized,
    Initializing,
    Initialized(T),
}

/// Thread-safe lazily initialized value.
///
/// The first caller of [`value`](Self::value) runs the initializer; callers
/// arriving while it runs block until it finishes and then observe the same
/// value.
pub struct LazyRef<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
    init: Box<dyn Fn() -> T + Send + Sync>,
}

/// Resets the cell to `Uninitialized` if the initializer unwinds.
struct InitGuard<'a, T> {
    cell: &'a LazyRef<T>,
    armed: bool,
}

impl<T> Drop for InitGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            *self.cell.lock() = State::Uninitialized;
            self.cell.ready.notify_all();
        }
    }
}

impl<T> LazyRef<T> {
    /// Create an uninitialized cell with the given initializer.
    pub fn new(init: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            state: Mutex::new(State::Uninitialized),
            ready: Condvar::new(),
            init: Box::new(init),
        }
    }

    /// Whether the value has been computed.
    pub fn has_value(&self) -> bool {
        matches!(*self.lock(), State::Initialized(_))
    }

    /// Get the value, computing it first if needed.
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        match &*self.initialized() {
            State::Initialized(value) => value.clone(),
            State::Uninitialized | State::Initializing => unreachable!("cell not initialized"),
        }
    }

    /// Replace the value with `f(current)`, computing it first if needed.
    ///
    /// The lock is held while `f` runs, so concurrent exchanges apply one
    /// after another and none is lost.
    pub fn exchange_value(&self, f: impl FnOnce(&T) -> T) {
        let mut state = self.initialized();
        if let State::Initialized(current) = &*state {
            let next = f(current);
            *state = State::Initialized(next);
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state, running the initializer first if nobody has.
    ///
    /// The returned guard always holds `State::Initialized`.
    fn initialized(&self) -> MutexGuard<'_, State<T>> {
        let mut state = self.lock();
        loop {
            if matches!(*state, State::Initialized(_)) {
                return state;
            }
            if matches!(*state, State::Initializing) {
                state = self
                    .ready
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            }

            *state = State::Initializing;
            drop(state);

            let mut guard = InitGuard {
                cell: self,
                armed: true,
            };
            let value = (self.init)();
            guard.armed = false;

            state = self.lock();
            *state = State::Initialized(value);
            self.ready.notify_all();
            return state;
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("LazyRef");
        match &*self.lock() {
            State::Uninitialized => d.field("state", &"uninitialized"),
            State::Initializing => d.field("state", &"initializing"),
            State::Initialized(value) => d.field("value", value),
        };
        d.finish()
    }
}

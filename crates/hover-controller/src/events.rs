//! Observer registration for controller notifications

use std::fmt;

/// A list of callbacks invoked with every emitted value
pub struct Listeners<T> {
    callbacks: Vec<Box<dyn FnMut(T)>>,
}

impl<T: Copy> Listeners<T> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Register a callback
    pub fn subscribe(&mut self, callback: impl FnMut(T) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Invoke every callback with `value`, in registration order
    pub fn emit(&mut self, value: T) {
        for callback in &mut self.callbacks {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T: Copy> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

/// Remembers the last reported value and only notifies when it changes
#[derive(Debug)]
pub struct ChangeNotifier<T> {
    current: T,
    listeners: Listeners<T>,
}

impl<T: Copy + PartialEq> ChangeNotifier<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            listeners: Listeners::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(T) + 'static) {
        self.listeners.subscribe(callback);
    }

    /// Report a value. Returns true if it differed from the previous report.
    pub fn report(&mut self, value: T) -> bool {
        if self.current == value {
            return false;
        }
        self.current = value;
        self.listeners.emit(value);
        true
    }

    pub fn current(&self) -> T {
        self.current
    }
}

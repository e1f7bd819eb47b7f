/// Handle identifying a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of change observers invoked synchronously on the owning thread.
///
/// Callbacks run only after the state change that triggered them has been
/// fully applied, so an observer never sees partial state.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn FnMut()>)>,
}

impl ObserverRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, returning the handle needed to remove it.
    pub fn register(&mut self, observer: impl FnMut() + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered callback.
    ///
    /// Returns `false` when the handle was not (or no longer) registered.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(candidate, _)| *candidate != id);
        self.observers.len() != before
    }

    /// Invoke every registered callback, in registration order.
    pub fn notify_changed(&mut self) {
        for (_, observer) in &mut self.observers {
            observer();
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` when no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn notifies_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ObserverRegistry::new();

        let first = Rc::clone(&order);
        registry.register(move || first.borrow_mut().push("first"));
        let second = Rc::clone(&order);
        registry.register(move || second.borrow_mut().push("second"));

        registry.notify_changed();
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unregistered_observers_stop_firing() {
        let count = Rc::new(RefCell::new(0));
        let mut registry = ObserverRegistry::new();

        let counter = Rc::clone(&count);
        let id = registry.register(move || *counter.borrow_mut() += 1);

        registry.notify_changed();
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        registry.notify_changed();

        assert_eq!(*count.borrow(), 1);
        assert!(registry.is_empty());
    }
}

//! Non-owning observer registry.
//!
//! A model keeps `Weak` handles to the things watching it: at most one bound
//! view (rebinding replaces it) plus any number of passive subscribers.
//! Observers own the model, never the other way round, so there is no
//! reference cycle to break by hand.

use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    pub struct ObserverKey;
}

pub struct Observers<O: ?Sized> {
    bound: Option<Weak<O>>,
    entries: SlotMap<ObserverKey, Weak<O>>,
    order: SmallVec<[ObserverKey; 4]>,
}

impl<O: ?Sized> Default for Observers<O> {
    fn default() -> Self {
        Self {
            bound: None,
            entries: SlotMap::with_key(),
            order: SmallVec::new(),
        }
    }
}

impl<O: ?Sized> Observers<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bound view, replacing the previous one.
    pub fn bind(&mut self, view: Weak<O>) {
        self.bound = Some(view);
    }

    pub fn unbind(&mut self) {
        self.bound = None;
    }

    pub fn bound(&self) -> Option<Rc<O>> {
        self.bound.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_bound_to(&self, view: &Weak<O>) -> bool {
        self.bound.as_ref().is_some_and(|b| b.ptr_eq(view))
    }

    pub fn subscribe(&mut self, observer: Weak<O>) -> ObserverKey {
        let key = self.entries.insert(observer);
        self.order.push(key);
        key
    }

    pub fn unsubscribe(&mut self, key: ObserverKey) -> bool {
        self.order.retain(|k| *k != key);
        self.entries.remove(key).is_some()
    }

    /// Live observers in delivery order: bound view first, then subscribers
    /// in registration order.
    pub fn live(&self) -> SmallVec<[Rc<O>; 4]> {
        let mut out = SmallVec::new();
        if let Some(view) = self.bound() {
            out.push(view);
        }
        out.extend(
            self.order
                .iter()
                .filter_map(|k| self.entries.get(*k))
                .filter_map(Weak::upgrade),
        );
        out
    }

    /// Drops subscribers whose owners went away.
    pub fn prune(&mut self) {
        let entries = &mut self.entries;
        self.order.retain(|k| {
            let alive = entries.get(*k).is_some_and(|w| w.strong_count() > 0);
            if !alive {
                entries.remove(*k);
            }
            alive
        });
        if self.bound.as_ref().is_some_and(|b| b.strong_count() == 0) {
            self.bound = None;
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Tagged {
        fn name(&self) -> &'static str;
    }

    struct Named(&'static str);
    impl Tagged for Named {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    fn names(obs: &Observers<dyn Tagged>) -> Vec<&'static str> {
        obs.live().iter().map(|o| o.name()).collect()
    }

    #[test]
    fn bound_view_comes_first_and_rebinding_replaces() {
        let mut obs: Observers<dyn Tagged> = Observers::new();
        let a: Rc<dyn Tagged> = Rc::new(Named("a"));
        let b: Rc<dyn Tagged> = Rc::new(Named("b"));
        let view1: Rc<dyn Tagged> = Rc::new(Named("view1"));
        let view2: Rc<dyn Tagged> = Rc::new(Named("view2"));

        obs.subscribe(Rc::downgrade(&a));
        obs.subscribe(Rc::downgrade(&b));
        obs.bind(Rc::downgrade(&view1));
        assert_eq!(names(&obs), vec!["view1", "a", "b"]);

        obs.bind(Rc::downgrade(&view2));
        assert_eq!(names(&obs), vec!["view2", "a", "b"]);
    }

    #[test]
    fn dropped_observers_are_skipped_and_pruned() {
        let mut obs: Observers<dyn Tagged> = Observers::new();
        let keep: Rc<dyn Tagged> = Rc::new(Named("keep"));
        let gone: Rc<dyn Tagged> = Rc::new(Named("gone"));

        let k1 = obs.subscribe(Rc::downgrade(&gone));
        obs.subscribe(Rc::downgrade(&keep));
        drop(gone);

        assert_eq!(names(&obs), vec!["keep"]);
        obs.prune();
        assert_eq!(obs.subscriber_count(), 1);
        assert!(!obs.unsubscribe(k1));
    }
}

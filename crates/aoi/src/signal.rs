use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Change notification raised by an [`crate::AoiElement`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AoiSignal {
    /// The set of selected pixels may have changed
    PointsChanged,
    /// Any change to the element, raised after every other signal
    Modified,
}

/// Handle returned by [`SignalHub::attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(AoiSignal)>;

/// Observers of one element, called synchronously in attach order.
#[derive(Default)]
pub struct SignalHub {
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl SignalHub {
    pub fn attach<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(AoiSignal) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not attached
    pub fn detach(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(attached, _)| *attached != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn emit(&mut self, signal: AoiSignal) {
        tracing::trace!(%signal, observers = self.observers.len(), "emit");
        for (_, observer) in &mut self.observers {
            observer(signal);
        }
    }
}

impl fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
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
    fn test_attach_and_detach() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut hub = SignalHub::default();

        let sink = Rc::clone(&received);
        let id = hub.attach(move |signal| sink.borrow_mut().push(signal));
        hub.emit(AoiSignal::PointsChanged);
        assert!(hub.detach(id));
        assert!(!hub.detach(id));
        hub.emit(AoiSignal::Modified);

        assert_eq!(*received.borrow(), vec![AoiSignal::PointsChanged]);
        assert!(hub.is_empty());
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(AoiSignal::PointsChanged.to_string(), "points_changed");
    }
}

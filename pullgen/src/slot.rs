use std::{cell::RefCell, mem, rc::Rc};

use crate::UsageError;

/// Outcome of the latest production step.
///
/// A value and a failure can never be held at the same time.
#[derive(Debug)]
pub(crate) enum Slot<T, E> {
    Empty,
    Value(T),
    Failure(E),
}

/// The single-slot handoff between a producer body and the handle
/// that resumes it.
///
/// Both sides hold a share of the same slot; the producer writes into it
/// from inside a step and the handle drains it right after the step.
#[derive(Debug)]
pub(crate) struct SuspensionPoint<T, E> {
    slot: Rc<RefCell<Slot<T, E>>>,
}

impl<T, E> SuspensionPoint<T, E> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot::Empty)),
        }
    }

    pub(crate) fn share(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }

    /// Records a produced value. Only one value may be produced per step.
    pub(crate) fn put(&self, value: T) {
        let mut slot = self.slot.borrow_mut();
        if !matches!(*slot, Slot::Empty) {
            UsageError::Overfilled.raise();
        }
        *slot = Slot::Value(value);
    }

    /// Records a captured failure, replacing anything left in the slot.
    pub(crate) fn fail(&self, error: E) {
        *self.slot.borrow_mut() = Slot::Failure(error);
    }

    /// Drains the slot: `Ok(Some(_))` for a value, `Err(_)` for a failure,
    /// `Ok(None)` when the step ended the sequence.
    pub(crate) fn fetch(&self) -> Result<Option<T>, E> {
        match mem::replace(&mut *self.slot.borrow_mut(), Slot::Empty) {
            Slot::Empty => Ok(None),
            Slot::Value(value) => Ok(Some(value)),
            Slot::Failure(error) => Err(error),
        }
    }

    /// Moves a produced value out, leaving a captured failure in place.
    pub(crate) fn take_value(&self) -> Option<T> {
        let mut slot = self.slot.borrow_mut();
        match mem::replace(&mut *slot, Slot::Empty) {
            Slot::Value(value) => Some(value),
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Surfaces a captured failure that has not been observed yet.
    pub(crate) fn take_failure(&self) -> Result<(), E> {
        let mut slot = self.slot.borrow_mut();
        match mem::replace(&mut *slot, Slot::Empty) {
            Slot::Failure(error) => Err(error),
            other => {
                *slot = other;
                Ok(())
            }
        }
    }

    pub(crate) fn holds_value(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Value(_))
    }

    pub(crate) fn holds_failure(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Failure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_drains_each_outcome_once() {
        let point = SuspensionPoint::<u32, &str>::new();
        point.put(7);
        assert_eq!(point.fetch(), Ok(Some(7)));
        assert_eq!(point.fetch(), Ok(None));

        point.fail("boom");
        assert_eq!(point.fetch(), Err("boom"));
        assert_eq!(point.fetch(), Ok(None));
    }

    #[test]
    fn failure_replaces_value() {
        let point = SuspensionPoint::<u32, &str>::new();
        point.put(1);
        point.fail("late");
        assert!(!point.holds_value());
        assert!(point.holds_failure());
    }

    #[test]
    fn take_value_keeps_failure() {
        let point = SuspensionPoint::<u32, &str>::new();
        point.fail("kept");
        assert_eq!(point.take_value(), None);
        assert_eq!(point.take_failure(), Err("kept"));
        assert_eq!(point.take_failure(), Ok(()));
    }

    #[test]
    fn shares_see_the_same_slot() {
        let point = SuspensionPoint::<u32, ()>::new();
        point.share().put(3);
        assert!(point.holds_value());
        assert_eq!(point.take_value(), Some(3));
    }

    #[test]
    #[should_panic(expected = "produced twice")]
    fn second_put_in_one_step_panics() {
        let point = SuspensionPoint::<u32, ()>::new();
        point.put(1);
        point.put(2);
    }
}

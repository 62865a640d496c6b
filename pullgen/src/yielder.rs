use std::{
    convert::Infallible,
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    chain::{ChainAwaiter, Resumable},
    slot::SuspensionPoint,
};

/// The producer side of a generator, handed to the producer body.
///
/// Only a running producer body holds a `Yielder`, which is what keeps
/// [`produce`](Yielder::produce) and [`chain`](Yielder::chain) out of
/// consumer code.
///
/// ```
/// use pullgen::{LazyGenerator, Yielder};
///
/// let mut countdown = LazyGenerator::new(|co: Yielder<u32>| async move {
///     for i in (1..=3).rev() {
///         co.produce(i).await;
///     }
///     Ok(())
/// });
///
/// let mut seen = vec![];
/// while countdown.pull().unwrap() {
///     seen.push(*countdown.value());
/// }
/// assert_eq!(seen, [3, 2, 1]);
/// ```
pub struct Yielder<T, E = Infallible> {
    point: SuspensionPoint<T, E>,
}

impl<T, E> Yielder<T, E> {
    pub(crate) fn new(point: SuspensionPoint<T, E>) -> Self {
        Self { point }
    }

    /// Hands `value` to the consumer and suspends until the next pull.
    pub fn produce(&self, value: T) -> Produce<'_, T, E> {
        Produce {
            point: &self.point,
            value: Some(value),
        }
    }

    /// Drives `inner` for one step from inside this producer body.
    ///
    /// Resolves to `Ok(Some(value))` with the inner generator's next value,
    /// `Ok(None)` once the inner sequence has ended, or the inner failure.
    /// Propagating that failure with `?` makes it this producer's failure.
    pub fn chain<'g, G>(&self, inner: &'g mut G) -> ChainAwaiter<'g, G>
    where
        G: Resumable + ?Sized,
    {
        ChainAwaiter::new(inner)
    }
}

impl<T, E> fmt::Debug for Yielder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Yielder").finish_non_exhaustive()
    }
}

pin_project_lite::pin_project! {
    /// Future returned by [`Yielder::produce`].
    ///
    /// The first poll stores the value and reports `Pending`, which ends the
    /// current production step. The poll after that completes it.
    #[must_use = "a produced value is only handed over when awaited"]
    pub struct Produce<'y, T, E> {
        point: &'y SuspensionPoint<T, E>,
        value: Option<T>,
    }
}

impl<T, E> Future for Produce<'_, T, E> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.value.take() {
            Some(value) => {
                this.point.put(value);
                Poll::Pending
            }
            None => Poll::Ready(()),
        }
    }
}

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

/// A producer that can be advanced one step at a time.
///
/// This is the narrow capability [`ChainAwaiter`] drives, implemented by
/// both [`LazyGenerator`](crate::LazyGenerator) and
/// [`BoundedGenerator`](crate::BoundedGenerator).
pub trait Resumable {
    /// Type of the values produced.
    type Item;
    /// Type of a captured producer failure.
    type Error;

    /// Hands out the next value not yet handed out, resuming the producer
    /// when it has none ready.
    ///
    /// `Ok(None)` means the sequence ended. Calling this again after that,
    /// or after a failure, is a usage error.
    fn poll_next_step(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<Self::Item>, Self::Error>>;

    /// Whether every value and failure has been handed out.
    fn is_done(&self) -> bool;
}

impl<G: Resumable + ?Sized> Resumable for &mut G {
    type Item = G::Item;
    type Error = G::Error;

    fn poll_next_step(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<Self::Item>, Self::Error>> {
        (**self).poll_next_step(cx)
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }
}

impl<G: Resumable + ?Sized> Resumable for Box<G> {
    type Item = G::Item;
    type Error = G::Error;

    fn poll_next_step(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<Self::Item>, Self::Error>> {
        (**self).poll_next_step(cx)
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }
}

/// Future returned by [`Yielder::chain`](crate::Yielder::chain).
///
/// The inner step runs inside the same poll as the outer producer, so
/// awaiting it adds no suspension of its own. If the inner producer awaits
/// something that is not ready, that `Pending` passes straight through.
#[must_use = "the inner generator is only resumed when awaited"]
#[derive(Debug)]
pub struct ChainAwaiter<'g, G: ?Sized> {
    inner: &'g mut G,
}

impl<'g, G: ?Sized> ChainAwaiter<'g, G> {
    pub(crate) fn new(inner: &'g mut G) -> Self {
        Self { inner }
    }
}

impl<G: Resumable + ?Sized> Future for ChainAwaiter<'_, G> {
    type Output = Result<Option<G::Item>, G::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_next_step(cx)
    }
}

use std::{
    fmt,
    future::Future,
    mem,
    pin::Pin,
    task::{ready, Context, Poll},
};

use tracing::{debug, trace};

use crate::{park::block_on_step, slot::SuspensionPoint, Status, UsageError, Yielder};

type Body<'a, E> = Pin<Box<dyn Future<Output = Result<(), E>> + 'a>>;
type Start<'a, T, E> = Box<dyn FnOnce(Yielder<T, E>) -> Body<'a, E> + 'a>;

enum Stage<'a, T, E> {
    NotStarted(Start<'a, T, E>),
    Suspended(Body<'a, E>),
    Terminated,
}

/// The suspended execution state of one producer, plus its slot.
pub(crate) struct Frame<'a, T, E> {
    stage: Stage<'a, T, E>,
    point: SuspensionPoint<T, E>,
}

impl<'a, T: 'a, E: 'a> Frame<'a, T, E> {
    /// Captures the producer. Nothing of it runs until the first resume,
    /// not even the closure that builds the body.
    pub(crate) fn new<P, F>(producer: P) -> Self
    where
        P: FnOnce(Yielder<T, E>) -> F + 'a,
        F: Future<Output = Result<(), E>> + 'a,
    {
        let start: Start<'a, T, E> = Box::new(move |co| -> Body<'a, E> { Box::pin(producer(co)) });
        Self {
            stage: Stage::NotStarted(start),
            point: SuspensionPoint::new(),
        }
    }
}

impl<'a, T, E> Frame<'a, T, E> {
    /// Runs one production step, leaving its outcome in the slot.
    pub(crate) fn poll_resume(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        let mut body = match mem::replace(&mut self.stage, Stage::Terminated) {
            Stage::NotStarted(start) => {
                trace!("starting producer");
                start(Yielder::new(self.point.share()))
            }
            Stage::Suspended(body) => body,
            Stage::Terminated => UsageError::Terminated.raise(),
        };

        match body.as_mut().poll(cx) {
            Poll::Pending => {
                self.stage = Stage::Suspended(body);
                if self.point.holds_value() {
                    trace!("producer suspended with a value");
                    Poll::Ready(())
                } else {
                    Poll::Pending
                }
            }
            // a produced value is always followed by a suspension
            Poll::Ready(_) if self.point.holds_value() => UsageError::NotSuspended.raise(),
            Poll::Ready(Ok(())) => {
                trace!("producer completed");
                Poll::Ready(())
            }
            Poll::Ready(Err(error)) => {
                debug!("producer failed; failure captured");
                self.point.fail(error);
                Poll::Ready(())
            }
        }
    }

    /// One production step, then the drained slot.
    pub(crate) fn poll_resume_and_fetch(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<T>, E>> {
        ready!(self.poll_resume(cx));
        Poll::Ready(self.point.fetch())
    }

    /// Blocking form of [`Frame::poll_resume`].
    pub(crate) fn resume(&mut self) {
        block_on_step(|cx| self.poll_resume(cx))
    }

    /// Blocking form of [`Frame::poll_resume_and_fetch`].
    pub(crate) fn resume_and_fetch(&mut self) -> Result<Option<T>, E> {
        block_on_step(|cx| self.poll_resume_and_fetch(cx))
    }

    pub(crate) fn take_value(&self) -> Option<T> {
        self.point.take_value()
    }

    pub(crate) fn take_failure(&self) -> Result<(), E> {
        self.point.take_failure()
    }

    pub(crate) fn is_terminated(&self) -> bool {
        matches!(self.stage, Stage::Terminated)
    }

    /// Terminated with nothing left in the slot to hand out.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.is_terminated() && !self.point.holds_value() && !self.point.holds_failure()
    }

    pub(crate) fn status(&self) -> Status {
        match self.stage {
            Stage::NotStarted(_) => Status::NotStarted,
            Stage::Suspended(_) => Status::Suspended,
            Stage::Terminated => Status::Terminated,
        }
    }
}

impl<T, E> Drop for Frame<'_, T, E> {
    fn drop(&mut self) {
        if let Stage::Suspended(_) = self.stage {
            debug!("dropping a suspended producer; its remaining body is abandoned");
        }
    }
}

impl<T, E> fmt::Debug for Frame<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

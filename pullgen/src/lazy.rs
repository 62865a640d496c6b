use std::{
    convert::Infallible,
    fmt,
    future::Future,
    mem,
    task::{Context, Poll},
};

use crate::{frame::Frame, Resumable, Status, UsageError, Yielder};

/// A generator that runs none of its producer until first pulled.
///
/// Meant for unbounded sequences, where computing anything ahead of demand
/// would be wasted work.
///
/// ```
/// use pullgen::{LazyGenerator, Yielder};
///
/// let mut naturals = LazyGenerator::new(|co: Yielder<u64>| async move {
///     for n in 0.. {
///         co.produce(n).await;
///     }
///     Ok(())
/// });
///
/// for expected in 0..5 {
///     assert!(naturals.pull().unwrap());
///     assert_eq!(*naturals.value(), expected);
/// }
/// ```
pub struct LazyGenerator<'a, T, E = Infallible> {
    frame: Option<Frame<'a, T, E>>,
    current: Option<T>,
}

impl<'a, T: 'a, E: 'a> LazyGenerator<'a, T, E> {
    /// Captures `producer` without running any of it.
    ///
    /// The body produces values through its [`Yielder`] and ends the
    /// sequence by returning `Ok(())`; returning `Err(_)` fails it.
    pub fn new<P, F>(producer: P) -> Self
    where
        P: FnOnce(Yielder<T, E>) -> F + 'a,
        F: Future<Output = Result<(), E>> + 'a,
    {
        Self {
            frame: Some(Frame::new(producer)),
            current: None,
        }
    }
}

impl<'a, T, E> LazyGenerator<'a, T, E> {
    /// Advances the producer by exactly one step.
    ///
    /// Returns `Ok(true)` when a value is available through
    /// [`value`](Self::value), `Ok(false)` once the sequence has ended, and
    /// the producer's failure the one time it is raised.
    ///
    /// # Panics
    ///
    /// When called again after the sequence ended or failed, or on a
    /// disengaged handle.
    pub fn pull(&mut self) -> Result<bool, E> {
        self.current = None;
        match self.frame_mut().resume_and_fetch()? {
            Some(value) => {
                self.current = Some(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The value produced by the latest successful [`pull`](Self::pull).
    ///
    /// # Panics
    ///
    /// When the latest pull did not produce a value.
    #[track_caller]
    pub fn value(&self) -> &T {
        match &self.current {
            Some(value) => value,
            None => UsageError::NoValue.raise(),
        }
    }

    pub fn status(&self) -> Status {
        self.frame.as_ref().map_or(Status::Disengaged, Frame::status)
    }

    /// Moves the producer out into a new handle, leaving this one
    /// disengaged.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    #[track_caller]
    fn frame_mut(&mut self) -> &mut Frame<'a, T, E> {
        match &mut self.frame {
            Some(frame) => frame,
            None => UsageError::Disengaged.raise(),
        }
    }
}

impl<T, E> Resumable for LazyGenerator<'_, T, E> {
    type Item = T;
    type Error = E;

    fn poll_next_step(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<T>, E>> {
        self.current = None;
        self.frame_mut().poll_resume_and_fetch(cx)
    }

    fn is_done(&self) -> bool {
        self.frame.as_ref().map_or(true, Frame::is_exhausted)
    }
}

impl<T, E> Default for LazyGenerator<'_, T, E> {
    /// A disengaged handle.
    fn default() -> Self {
        Self {
            frame: None,
            current: None,
        }
    }
}

// A pinned handle is never projected to `current`: `Stream::poll_next`
// goes through `Pin::get_mut`, and the producer body is boxed.
impl<T, E> Unpin for LazyGenerator<'_, T, E> {}

impl<T, E> fmt::Debug for LazyGenerator<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyGenerator")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "stream")]
mod stream {
    use std::{
        pin::Pin,
        task::{Context, Poll},
    };

    use futures_core::{FusedStream, Stream};

    use super::LazyGenerator;

    /// Each poll is one production step driven by the caller's context, so
    /// a producer awaiting a timer or a channel yields `Pending` instead of
    /// blocking the thread.
    impl<T, E> Stream for LazyGenerator<'_, T, E> {
        type Item = Result<T, E>;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            let this = self.get_mut();
            this.current = None;
            match &mut this.frame {
                Some(frame) if !frame.is_terminated() => {
                    frame.poll_resume_and_fetch(cx).map(Result::transpose)
                }
                _ => Poll::Ready(None),
            }
        }
    }

    impl<T, E> FusedStream for LazyGenerator<'_, T, E> {
        fn is_terminated(&self) -> bool {
            self.frame.as_ref().map_or(true, |frame| frame.is_terminated())
        }
    }
}

use std::{
    convert::Infallible,
    fmt,
    future::Future,
    iter::FusedIterator,
    mem,
    task::{Context, Poll},
};

use crate::{frame::Frame, park::block_on_step, Resumable, Status, UsageError, Yielder};

/// A generator that runs its producer up to the first value as soon as it
/// is built.
///
/// Meant for producers known to terminate: running ahead lets
/// [`done`](Self::done) answer without a pull, and the generator can be
/// consumed with a `for` loop.
///
/// ```
/// use pullgen::{BoundedGenerator, Yielder};
///
/// let squares = BoundedGenerator::new(|co: Yielder<u32>| async move {
///     for i in 1..=4 {
///         co.produce(i * i).await;
///     }
///     Ok(())
/// });
///
/// let squares: Vec<u32> = squares.into_iter().map(Result::unwrap).collect();
/// assert_eq!(squares, [1, 4, 9, 16]);
/// ```
pub struct BoundedGenerator<'a, T, E = Infallible> {
    frame: Option<Frame<'a, T, E>>,
    current: Option<T>,
    /// The producer ended during construction and no consumer has been
    /// told yet.
    end_pending: bool,
}

impl<'a, T: 'a, E: 'a> BoundedGenerator<'a, T, E> {
    /// Captures `producer` and runs it until it first produces, ends or
    /// fails.
    ///
    /// A failure in that first step is held back and raised by the first
    /// [`pull`](Self::pull), [`begin`](Self::begin) or iteration step.
    pub fn new<P, F>(producer: P) -> Self
    where
        P: FnOnce(Yielder<T, E>) -> F + 'a,
        F: Future<Output = Result<(), E>> + 'a,
    {
        let mut frame = Frame::new(producer);
        frame.resume();
        let current = frame.take_value();
        let end_pending = frame.is_exhausted();
        Self {
            frame: Some(frame),
            current,
            end_pending,
        }
    }
}

impl<'a, T, E> BoundedGenerator<'a, T, E> {
    /// Advances the producer by exactly one step.
    ///
    /// The value produced at construction is readable through
    /// [`value`](Self::value) before any pull, and the first pull moves
    /// past it. A `while gen.pull()? { .. }` loop therefore never sees that
    /// first value; read it before pulling, or iterate the generator
    /// instead, which hands it out first.
    ///
    /// If the sequence already ended during construction, the first pull
    /// returns `Ok(false)`.
    ///
    /// # Panics
    ///
    /// When called again after the sequence ended or failed, or on a
    /// disengaged handle.
    pub fn pull(&mut self) -> Result<bool, E> {
        self.current = None;
        if mem::take(&mut self.end_pending) {
            return Ok(false);
        }
        let frame = self.frame_mut();
        frame.take_failure()?;
        match frame.resume_and_fetch()? {
            Some(value) => {
                self.current = Some(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether the sequence has ended, with no failure left to raise.
    ///
    /// A disengaged handle counts as done.
    pub fn done(&self) -> bool {
        self.frame.as_ref().map_or(true, Frame::is_exhausted)
    }

    /// The current value: the one produced at construction, or by the latest
    /// successful [`pull`](Self::pull).
    ///
    /// # Panics
    ///
    /// When there is no current value, including after iteration has moved
    /// it out.
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

    /// Start marker of a traversal; compare against [`Cursor::end`].
    ///
    /// Raises a failure captured while the generator was being built.
    ///
    /// ```
    /// use pullgen::{BoundedGenerator, Cursor, Yielder};
    ///
    /// let mut letters = BoundedGenerator::new(|co: Yielder<char>| async move {
    ///     co.produce('a').await;
    ///     co.produce('b').await;
    ///     Ok(())
    /// });
    ///
    /// let mut out = String::new();
    /// let mut cursor = letters.begin().unwrap();
    /// while cursor != Cursor::end() {
    ///     out.push(*cursor.get());
    ///     cursor.advance().unwrap();
    /// }
    /// assert_eq!(out, "ab");
    /// ```
    pub fn begin(&mut self) -> Result<Cursor<'_, 'a, T, E>, E> {
        if let Some(frame) = &self.frame {
            frame.take_failure()?;
        }
        Ok(Cursor { gen: Some(self) })
    }

    pub fn iter(&mut self) -> Iter<'_, 'a, T, E> {
        Iter { gen: self }
    }

    fn next_item(&mut self) -> Option<Result<T, E>> {
        if self.current.is_none() && self.done() {
            return None;
        }
        block_on_step(|cx| self.poll_next_step(cx)).transpose()
    }

    #[track_caller]
    fn frame_mut(&mut self) -> &mut Frame<'a, T, E> {
        match &mut self.frame {
            Some(frame) => frame,
            None => UsageError::Disengaged.raise(),
        }
    }
}

impl<T, E> Resumable for BoundedGenerator<'_, T, E> {
    type Item = T;
    type Error = E;

    /// The value produced ahead at construction (or by a `pull` not yet
    /// iterated over) is handed out before the producer is resumed.
    fn poll_next_step(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<T>, E>> {
        if let Some(value) = self.current.take() {
            return Poll::Ready(Ok(Some(value)));
        }
        if mem::take(&mut self.end_pending) {
            return Poll::Ready(Ok(None));
        }
        let frame = self.frame_mut();
        frame.take_failure()?;
        frame.poll_resume_and_fetch(cx)
    }

    fn is_done(&self) -> bool {
        self.current.is_none() && self.done()
    }
}

impl<T, E> Default for BoundedGenerator<'_, T, E> {
    /// A disengaged handle.
    fn default() -> Self {
        Self {
            frame: None,
            current: None,
            end_pending: false,
        }
    }
}

impl<T, E> fmt::Debug for BoundedGenerator<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedGenerator")
            .field("status", &self.status())
            .field("done", &self.done())
            .finish_non_exhaustive()
    }
}

/// Traversal marker over a [`BoundedGenerator`].
///
/// Equality is deliberately degenerate: two cursors are equal exactly when
/// both are at the end (an [`end`](Cursor::end) marker or a drained
/// generator). It tells "more data" from "no more data" and nothing else,
/// so the only meaningful comparison is a live cursor against
/// `Cursor::end()`. Two live cursors never denote distinct positions.
pub struct Cursor<'g, 'a, T, E = Infallible> {
    gen: Option<&'g mut BoundedGenerator<'a, T, E>>,
}

impl<'g, 'a, T, E> Cursor<'g, 'a, T, E> {
    /// The end marker.
    pub fn end() -> Self {
        Self { gen: None }
    }

    pub fn is_end(&self) -> bool {
        self.gen.as_ref().map_or(true, |gen| gen.done())
    }

    /// The current value of the underlying generator.
    ///
    /// # Panics
    ///
    /// On an end marker, or when the generator has no current value.
    #[track_caller]
    pub fn get(&self) -> &T {
        match &self.gen {
            Some(gen) => gen.value(),
            None => UsageError::PastEnd.raise(),
        }
    }

    /// Pulls the underlying generator once.
    ///
    /// # Panics
    ///
    /// When the cursor is already at the end.
    #[track_caller]
    pub fn advance(&mut self) -> Result<(), E> {
        match &mut self.gen {
            Some(gen) if !gen.done() => gen.pull().map(drop),
            _ => UsageError::PastEnd.raise(),
        }
    }
}

impl<T, E> PartialEq for Cursor<'_, '_, T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.is_end() == other.is_end()
    }
}

impl<T, E> fmt::Debug for Cursor<'_, '_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("end", &self.is_end())
            .finish()
    }
}

/// Borrowing iterator over a [`BoundedGenerator`]; see
/// [`BoundedGenerator::iter`].
///
/// Values are moved out of the generator. A failure is yielded once and
/// ends the iteration.
pub struct Iter<'g, 'a, T, E = Infallible> {
    gen: &'g mut BoundedGenerator<'a, T, E>,
}

impl<T, E> Iterator for Iter<'_, '_, T, E> {
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.gen.next_item()
    }
}

impl<T, E> FusedIterator for Iter<'_, '_, T, E> {}

/// Owning iterator over a [`BoundedGenerator`].
pub struct IntoIter<'a, T, E = Infallible> {
    gen: BoundedGenerator<'a, T, E>,
}

impl<T, E> Iterator for IntoIter<'_, T, E> {
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.gen.next_item()
    }
}

impl<T, E> FusedIterator for IntoIter<'_, T, E> {}

impl<'a, T, E> IntoIterator for BoundedGenerator<'a, T, E> {
    type Item = Result<T, E>;
    type IntoIter = IntoIter<'a, T, E>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { gen: self }
    }
}

impl<'g, 'a, T, E> IntoIterator for &'g mut BoundedGenerator<'a, T, E> {
    type Item = Result<T, E>;
    type IntoIter = Iter<'g, 'a, T, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> BoundedGenerator<'a, T, Infallible> {
    /// Iterates the values of a generator that cannot fail.
    pub fn values(self) -> impl Iterator<Item = T> + 'a
    where
        T: 'a,
    {
        self.into_iter().map(|item| match item {
            Ok(value) => value,
            Err(never) => match never {},
        })
    }
}

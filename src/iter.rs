use crate::cursor::Cursor;
use crate::err::RiErr;
use crate::{RiRes, StatePolicy};
use std::mem;
use std::ops::Add;

/// The wrapper's cursor slot. `Taken` is left behind once the state has been
/// transferred to a derived sequence; every later use of the wrapper errors.
pub(crate) enum Source<T> {
    Live(Cursor<T>),
    Taken,
}

/// Stateful wrapper around a pull-based sequence: a cursor, a one-slot look-ahead
/// and the [`StatePolicy`] applied whenever an operator derives a new sequence.
pub struct RichIter<T> {
    pub(crate) policy: StatePolicy,
    pub(crate) source: Source<T>,
    pub(crate) peeked: Option<T>,
}

impl<T: 'static> RichIter<T> {
    /// Wraps a source under [`StatePolicy::Share`].
    pub fn wrap<I>(source: I) -> RichIter<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::wrap_with(source, StatePolicy::Share)
    }

    pub fn wrap_with<I>(source: I, policy: StatePolicy) -> RichIter<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_cursor(Cursor::new(source.into_iter()), policy)
    }

    pub(crate) fn from_cursor(cursor: Cursor<T>, policy: StatePolicy) -> RichIter<T> {
        RichIter { policy, source: Source::Live(cursor), peeked: None }
    }

    pub fn policy(&self) -> StatePolicy {
        self.policy
    }

    /// Returns the next element, draining the look-ahead slot first.
    ///
    /// Signals [`RiErr::Exhausted`] at the end of the sequence (and on every call
    /// thereafter), [`RiErr::Unusable`] once the state has been transferred away.
    pub fn pull(&mut self) -> RiRes<T> {
        if let Some(item) = self.peeked.take() {
            return Ok(item);
        }
        match &mut self.source {
            Source::Live(cursor) => cursor.next().ok_or(RiErr::Exhausted),
            Source::Taken => Err(RiErr::Unusable),
        }
    }

    /// Returns the next element without consuming it; idempotent until the next `pull`.
    pub fn peek(&mut self) -> RiRes<&T> {
        if self.peeked.is_none() {
            let item = match &mut self.source {
                Source::Live(cursor) => cursor.next().ok_or(RiErr::Exhausted)?,
                Source::Taken => return Err(RiErr::Unusable),
            };
            self.peeked = Some(item);
        }
        self.peeked.as_ref().ok_or(RiErr::Exhausted)
    }

    /// Whether a `pull` would succeed; exhaustion is `Ok(false)`, never an error.
    pub fn has_next(&mut self) -> RiRes<bool> {
        match self.peek() {
            Ok(_) => Ok(true),
            Err(RiErr::Exhausted) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn live(&self) -> RiRes<&Cursor<T>> {
        match &self.source {
            Source::Live(cursor) => Ok(cursor),
            Source::Taken => Err(RiErr::Unusable),
        }
    }

    pub(crate) fn take_live(&mut self) -> RiRes<Cursor<T>> {
        match mem::replace(&mut self.source, Source::Taken) {
            Source::Live(cursor) => Ok(cursor),
            Source::Taken => Err(RiErr::Unusable),
        }
    }
}

impl<T: Clone + 'static> RichIter<T> {
    /// Forks the cursor; the caller keeps one branch, the returned wrapper (same
    /// policy) gets the other. Both stand at the same position, a buffered
    /// look-ahead element included, and iterate independently from here on.
    pub fn duplicate(&mut self) -> RiRes<RichIter<T>> {
        let (keep, handout) = self.take_live()?.fork();
        self.source = Source::Live(keep);
        Ok(RichIter { policy: self.policy, source: Source::Live(handout), peeked: self.peeked.clone() })
    }

    /// Splits the wrapper into `n` independent same-policy forks, consuming it.
    /// Taking ownership keeps the drained source out of reach: pulling it behind the
    /// forks' back would corrupt their shared replay buffer.
    pub fn tee(self, n: usize) -> RiRes<Vec<RichIter<T>>> {
        let RichIter { policy, source, peeked } = self;
        let cursor = match source {
            Source::Live(cursor) => cursor,
            Source::Taken => return Err(RiErr::Unusable),
        };
        let mut forks = Vec::with_capacity(n);
        if n == 0 {
            return Ok(forks);
        }
        let mut rest = cursor;
        for _ in 1..n {
            let (handout, keep) = rest.fork();
            forks.push(RichIter { policy, source: Source::Live(handout), peeked: peeked.clone() });
            rest = keep;
        }
        forks.push(RichIter { policy, source: Source::Live(rest), peeked });
        Ok(forks)
    }

    /// Infinite arithmetic progression `start, start + step, start + 2 * step, ..`.
    pub fn counting(start: T, step: T, policy: StatePolicy) -> RichIter<T>
    where
        T: Add<Output = T>,
    {
        let numbers = std::iter::successors(Some(start), move |last| Some(last.clone() + step.clone()));
        Self::wrap_with(numbers, policy)
    }

    /// Repeats `value` the given number of times, or forever when `times` is `None`.
    pub fn repeating(value: T, times: Option<usize>, policy: StatePolicy) -> RichIter<T> {
        match times {
            Some(times) => Self::wrap_with(std::iter::repeat(value).take(times), policy),
            None => Self::wrap_with(std::iter::repeat(value), policy),
        }
    }
}

/// `next` is [`RichIter::pull`] with exhaustion mapped to `None`. Iterating a
/// wrapper whose state was transferred away panics; `pull` is the non-panicking path.
impl<T: 'static> Iterator for RichIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self.pull() {
            Ok(item) => Some(item),
            Err(RiErr::Exhausted) => None,
            Err(err) => panic!("{err}"),
        }
    }
}

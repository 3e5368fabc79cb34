mod cycle;
mod group;

use crate::cursor::{BoxIter, Cursor};
use crate::err::RiErr;
use crate::iter::{RichIter, Source};
use crate::op::cycle::CycleBuffered;
use crate::op::group::AdjacentGroups;
use crate::{RiRes, StatePolicy};
use itertools::{EitherOrBoth, Itertools};
use std::iter::Sum;
use std::ops::Add;

impl<T: Clone + 'static> RichIter<T> {
    /// Applies the state policy and hands out the cursor a primitive operation will
    /// consume: `Share` aliases the live state, `Copy` forks it first and keeps one
    /// branch (on every call, whether or not the wrapper is touched again),
    /// `Transfer` moves it out and leaves the wrapper unusable.
    fn source_for_op(&mut self) -> RiRes<Cursor<T>> {
        match self.policy {
            StatePolicy::Share => Ok(self.live()?.share()),
            StatePolicy::Copy => {
                let (keep, handout) = self.take_live()?.fork();
                self.source = Source::Live(keep);
                Ok(handout)
            }
            StatePolicy::Transfer => {
                let cursor = self.take_live()?;
                self.peeked = None;
                Ok(cursor)
            }
        }
    }

    /// Runs `build` on the policy-adjusted cursor and wraps its output in a new
    /// wrapper carrying the same policy.
    fn rewrap<U, I, F>(&mut self, build: F) -> RiRes<RichIter<U>>
    where
        U: 'static,
        I: Iterator<Item = U> + 'static,
        F: FnOnce(Cursor<T>) -> I,
    {
        let source = self.source_for_op()?;
        Ok(RichIter::from_cursor(Cursor::new(build(source)), self.policy))
    }

    /* **************************************** transform **************************************** */

    pub fn map<U, F>(&mut self, f: F) -> RiRes<RichIter<U>>
    where
        U: 'static,
        F: FnMut(T) -> U + 'static,
    {
        self.rewrap(move |source| source.map(f))
    }

    pub fn enumerate(&mut self) -> RiRes<RichIter<(usize, T)>> {
        self.rewrap(|source| source.enumerate())
    }

    /// Running sums: `[1, 2, 3]` becomes `[1, 3, 6]`.
    pub fn accumulate(&mut self) -> RiRes<RichIter<T>>
    where
        T: Add<Output = T>,
    {
        self.accumulate_with(|acc, item| acc + item)
    }

    /// Running totals under a custom combinator; the first element passes through as is.
    pub fn accumulate_with<F>(&mut self, mut f: F) -> RiRes<RichIter<T>>
    where
        F: FnMut(T, T) -> T + 'static,
    {
        self.rewrap(move |source| {
            source.scan(None::<T>, move |acc, item| {
                let total = match acc.take() {
                    None => item,
                    Some(prev) => f(prev, item),
                };
                *acc = Some(total.clone());
                Some(total)
            })
        })
    }

    /* **************************************** select **************************************** */

    pub fn filter<P>(&mut self, pred: P) -> RiRes<RichIter<T>>
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.rewrap(move |source| source.filter(pred))
    }

    pub fn filter_false<P>(&mut self, mut pred: P) -> RiRes<RichIter<T>>
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.rewrap(move |source| source.filter(move |item| !pred(item)))
    }

    pub fn drop_while<P>(&mut self, pred: P) -> RiRes<RichIter<T>>
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.rewrap(move |source| source.skip_while(pred))
    }

    pub fn take_while<P>(&mut self, pred: P) -> RiRes<RichIter<T>>
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.rewrap(move |source| source.take_while(pred))
    }

    /// Keeps the elements whose selector is `true`; stops with the shorter side.
    pub fn compress<S>(&mut self, selectors: S) -> RiRes<RichIter<T>>
    where
        S: IntoIterator<Item = bool>,
        S::IntoIter: 'static,
    {
        self.rewrap(move |source| source.zip(selectors).filter_map(|(item, keep)| keep.then_some(item)))
    }

    /// Elements from position `start` up to `stop` (exclusive, open-ended when `None`),
    /// taking every `step`-th. A zero `step` is rejected before any policy side effect.
    pub fn slice(&mut self, start: usize, stop: Option<usize>, step: usize) -> RiRes<RichIter<T>> {
        if step == 0 {
            return Err(RiErr::BadArg { op: "slice", arg: "step", arg_value: step.to_string() });
        }
        self.rewrap(move |source| -> BoxIter<T> {
            let rest = source.skip(start);
            match stop {
                Some(stop) => Box::new(rest.take(stop.saturating_sub(start)).step_by(step)),
                None => Box::new(rest.step_by(step)),
            }
        })
    }

    /* **************************************** combine **************************************** */

    /// Appends `other` after this wrapper's elements.
    pub fn chain<I>(&mut self, other: I) -> RiRes<RichIter<T>>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        self.rewrap(move |source| source.chain(other))
    }

    pub fn zip<J>(&mut self, other: J) -> RiRes<RichIter<(T, J::Item)>>
    where
        J: IntoIterator,
        J::IntoIter: 'static,
        J::Item: 'static,
    {
        self.rewrap(move |source| source.zip(other))
    }

    /// Like [`zip`](RichIter::zip) but runs to the end of the longer side, yielding
    /// [`EitherOrBoth`] so the unmatched tail stays visible.
    pub fn zip_longest<J>(&mut self, other: J) -> RiRes<RichIter<EitherOrBoth<T, J::Item>>>
    where
        J: IntoIterator,
        J::IntoIter: 'static,
        J::Item: 'static,
    {
        self.rewrap(move |source| source.zip_longest(other))
    }

    pub fn product<J>(&mut self, other: J) -> RiRes<RichIter<(T, J::Item)>>
    where
        J: IntoIterator,
        J::IntoIter: Clone + 'static,
        J::Item: Clone + 'static,
    {
        self.rewrap(move |source| source.cartesian_product(other))
    }

    /// The `repeat`-fold cartesian self-product, in lexicographic order. The pool is
    /// materialized when the operator is called, as the primitive requires; the
    /// zero-fold product is a single empty row.
    pub fn product_repeat(&mut self, repeat: usize) -> RiRes<RichIter<Vec<T>>> {
        self.rewrap(move |source| -> BoxIter<Vec<T>> {
            let pool: Vec<T> = source.collect();
            if repeat == 0 {
                Box::new(std::iter::once(Vec::new()))
            } else {
                Box::new((0..repeat).map(move |_| pool.clone()).multi_cartesian_product())
            }
        })
    }

    pub fn permutations(&mut self, k: usize) -> RiRes<RichIter<Vec<T>>> {
        self.rewrap(move |source| source.permutations(k))
    }

    pub fn combinations(&mut self, k: usize) -> RiRes<RichIter<Vec<T>>> {
        self.rewrap(move |source| source.combinations(k))
    }

    pub fn combinations_with_replacement(&mut self, k: usize) -> RiRes<RichIter<Vec<T>>> {
        self.rewrap(move |source| source.combinations_with_replacement(k))
    }

    /* **************************************** regroup **************************************** */

    /// Cycles through the elements forever by buffering the first pass.
    pub fn cycle(&mut self) -> RiRes<RichIter<T>> {
        self.rewrap(CycleBuffered::new)
    }

    /// Groups adjacent elements mapping to the same key. Every group comes back as a
    /// wrapper of the same policy so further operators chain onto it directly.
    pub fn group_by<K, F>(&mut self, key: F) -> RiRes<RichIter<(K, RichIter<T>)>>
    where
        K: PartialEq + 'static,
        F: FnMut(&T) -> K + 'static,
    {
        let policy = self.policy;
        self.rewrap(move |source| {
            AdjacentGroups::new(source, key).map(move |(key, group)| (key, RichIter::wrap_with(group, policy)))
        })
    }

    /* **************************************** reduce **************************************** */

    /// Folds the remaining elements into one; `Ok(None)` on an empty sequence.
    /// A scalar, not a wrapper — the policy side effects still apply.
    pub fn reduce<F>(&mut self, f: F) -> RiRes<Option<T>>
    where
        F: FnMut(T, T) -> T,
    {
        Ok(self.source_for_op()?.reduce(f))
    }

    /// Sums the remaining elements; the other scalar reducer, like [`RichIter::reduce`].
    pub fn sum<S>(&mut self) -> RiRes<S>
    where
        S: Sum<T>,
    {
        Ok(self.source_for_op()?.sum())
    }
}

impl<T> RichIter<T>
where
    T: IntoIterator + Clone + 'static,
    T::IntoIter: 'static,
    T::Item: 'static,
{
    /// The flattening mode of [`chain`](RichIter::chain): treats the wrapper's own
    /// elements as sequences and concatenates them.
    pub fn chain_flatten(&mut self) -> RiRes<RichIter<T::Item>> {
        self.rewrap(|source| source.flatten())
    }
}

impl<A: Clone + 'static, B: Clone + 'static> RichIter<(A, B)> {
    /// [`map`](RichIter::map) over pair elements with the pair unpacked into two
    /// arguments.
    pub fn starmap<R, F>(&mut self, mut f: F) -> RiRes<RichIter<R>>
    where
        R: 'static,
        F: FnMut(A, B) -> R + 'static,
    {
        self.rewrap(move |source| source.map(move |(a, b)| f(a, b)))
    }
}

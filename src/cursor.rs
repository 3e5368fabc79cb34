use itertools::Itertools;
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) type BoxIter<T> = Box<dyn Iterator<Item = T>>;

/// Pull handle over the underlying sequence.
///
/// The iterator is fused and boxed behind a shared cell so that one live iteration
/// state can be aliased (`share`), forked into independent replaying handles
/// (`fork`) or moved out wholesale. Fusing on entry makes exhaustion permanent no
/// matter how the wrapped source behaves after its first `None`.
pub(crate) struct Cursor<T> {
    inner: Rc<RefCell<BoxIter<T>>>,
}

impl<T: 'static> Cursor<T> {
    pub(crate) fn new(iter: impl Iterator<Item = T> + 'static) -> Cursor<T> {
        Cursor { inner: Rc::new(RefCell::new(Box::new(iter.fuse()))) }
    }

    /// Another handle onto the same live state; advancing either advances both.
    pub(crate) fn share(&self) -> Cursor<T> {
        Cursor { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Clone + 'static> Cursor<T> {
    /// Splits into two handles that each replay every element not yet pulled.
    pub(crate) fn fork(self) -> (Cursor<T>, Cursor<T>) {
        let (left, right) = self.tee();
        (Cursor::new(left), Cursor::new(right))
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.borrow_mut().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_share_aliases_one_state() {
        let mut a = Cursor::new(1..=4);
        let mut b = a.share();
        assert_eq!(a.next(), Some(1));
        assert_eq!(b.next(), Some(2));
        assert_eq!(a.next(), Some(3));
        assert_eq!(b.next(), Some(4));
        assert_eq!(a.next(), None);
        assert_eq!(b.next(), None);
    }

    #[test]
    fn test_fork_replays_independently() {
        let mut cursor = Cursor::new(1..=5);
        cursor.next();
        let (mut left, right) = cursor.fork();
        assert_eq!(right.collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert_eq!(left.next(), Some(2));
        assert_eq!(left.collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_exhaustion_is_permanent() {
        let mut cursor = Cursor::new(std::iter::once(0));
        assert_eq!(cursor.next(), Some(0));
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.next(), None);
    }
}

//! Output sinks.
//!
//! Every engine entry point reports its results through [`Sink`]s, so a
//! caller can hand in a plain collection or a per-element callback and both
//! reduce to the same shape.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

/// A destination that accepts emitted elements one at a time.
pub trait Sink<T> {
    /// Receive one element.
    fn accept(&mut self, item: T);
}

impl<T> Sink<T> for Vec<T> {
    fn accept(&mut self, item: T) {
        self.push(item);
    }
}

impl<T> Sink<T> for VecDeque<T> {
    fn accept(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T: Eq + Hash> Sink<T> for HashSet<T> {
    fn accept(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T: Ord> Sink<T> for BTreeSet<T> {
    fn accept(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T, S: Sink<T> + ?Sized> Sink<T> for &mut S {
    fn accept(&mut self, item: T) {
        (**self).accept(item);
    }
}

/// A [`Sink`] backed by a closure. Built with [`from_fn`].
#[derive(Clone, Debug)]
pub struct FromFn<F>(F);

impl<T, F: FnMut(T)> Sink<T> for FromFn<F> {
    fn accept(&mut self, item: T) {
        (self.0)(item);
    }
}

/// Wrap a closure so it can be passed wherever a [`Sink`] is expected.
///
/// ```
/// use reconcile_diff::{from_fn, Sink};
///
/// let mut total = 0;
/// let mut sink = from_fn(|n: i32| total += n);
/// sink.accept(2);
/// sink.accept(3);
/// drop(sink);
/// assert_eq!(total, 5);
/// ```
pub fn from_fn<T, F: FnMut(T)>(f: F) -> FromFn<F> {
    FromFn(f)
}

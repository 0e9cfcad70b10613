//! Peek-and-restore over single-pass iterators.

use std::iter::Chain;
use std::option::IntoIter as OptionIter;

/// An iterator with its first element pulled out and chained back in front.
pub type Restored<I> = Chain<OptionIter<<I as Iterator>::Item>, I>;

/// Pull the first element of `iter` without losing it.
///
/// Returns a clone of the first element (if any) together with an iterator
/// that yields the original sequence unchanged.
pub fn peek<I>(mut iter: I) -> (Option<I::Item>, Restored<I>)
where
    I: Iterator,
    I::Item: Clone,
{
    let first = iter.next();
    (first.clone(), first.into_iter().chain(iter))
}

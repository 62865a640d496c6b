//! Producers that consume other generators through
//! [`Yielder::chain`](crate::Yielder::chain).
//!
//! ```
//! use pullgen::{adapters, LazyGenerator, Yielder};
//!
//! let naturals = LazyGenerator::new(|co: Yielder<u32>| async move {
//!     for n in 0.. {
//!         co.produce(n).await;
//!     }
//!     Ok(())
//! });
//!
//! let odd_squares = adapters::map(adapters::filter(naturals, |n| n % 2 == 1), |n| n * n);
//! let first: Vec<u32> = adapters::take_n(odd_squares, 4).values().collect();
//! assert_eq!(first, [1, 9, 25, 49]);
//! ```

use crate::{BoundedGenerator, LazyGenerator, Resumable};

/// Re-yields the first `count` values of `gen`, then ends.
///
/// Ends early if `gen` does, and fails if `gen` fails within those values.
/// Built eagerly, so the first inner value is pulled right away.
pub fn take_n<'a, G>(gen: G, count: usize) -> BoundedGenerator<'a, G::Item, G::Error>
where
    G: Resumable + 'a,
    G::Item: 'a,
    G::Error: 'a,
{
    BoundedGenerator::new(move |co| async move {
        let mut gen = gen;
        for _ in 0..count {
            match co.chain(&mut gen).await? {
                Some(value) => co.produce(value).await,
                None => break,
            }
        }
        Ok(())
    })
}

/// Yields `f(v)` for every `v` of `gen`, ending or failing when `gen` does.
pub fn map<'a, G, U, F>(gen: G, f: F) -> LazyGenerator<'a, U, G::Error>
where
    G: Resumable + 'a,
    F: FnMut(G::Item) -> U + 'a,
    U: 'a,
    G::Error: 'a,
{
    LazyGenerator::new(move |co| async move {
        let (mut gen, mut f) = (gen, f);
        while let Some(value) = co.chain(&mut gen).await? {
            co.produce(f(value)).await;
        }
        Ok(())
    })
}

/// Yields the values of `gen` for which `predicate` holds.
pub fn filter<'a, G, P>(gen: G, predicate: P) -> LazyGenerator<'a, G::Item, G::Error>
where
    G: Resumable + 'a,
    P: FnMut(&G::Item) -> bool + 'a,
    G::Item: 'a,
    G::Error: 'a,
{
    LazyGenerator::new(move |co| async move {
        let (mut gen, mut predicate) = (gen, predicate);
        while let Some(value) = co.chain(&mut gen).await? {
            if predicate(&value) {
                co.produce(value).await;
            }
        }
        Ok(())
    })
}

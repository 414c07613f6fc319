//! Small iterator helpers.

use std::iter::Zip;

/// Zips two iterators that must yield the same number of items.
///
/// The refinement merge pairs mesh indices with refinement-output indices, and the two contour
/// tables have to line up one-to-one. Plain [`Iterator::zip`] would silently truncate to the
/// shorter side and corrupt the landmark set without a visible failure; this panics at the call
/// site instead.
#[track_caller]
pub fn zip_exact<A, B>(a: A, b: B) -> Zip<A::IntoIter, B::IntoIter>
where
    A: IntoIterator,
    B: IntoIterator,
    A::IntoIter: ExactSizeIterator,
    B::IntoIter: ExactSizeIterator,
{
    let a = a.into_iter();
    let b = b.into_iter();
    assert_eq!(
        a.len(),
        b.len(),
        "zip_exact: iterators yield {} vs {} items",
        a.len(),
        b.len(),
    );
    a.zip(b)
}

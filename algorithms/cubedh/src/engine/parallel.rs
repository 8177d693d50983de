//! Parallel Path Evaluation
//!
//! The two action paths of an exchange read only immutable inputs and write
//! their own fresh outputs, so they can run on separate threads. With the
//! `multithread` feature they go through `rayon::join`; otherwise they run
//! one after the other. The results are identical either way.

// =============================================================================
// JOIN
// =============================================================================

/// Evaluate `left` and `right`, concurrently when `multithread` is enabled.
#[inline]
pub fn join_paths<L, R, A, B>(left: L, right: R) -> (A, B)
where
    L: FnOnce() -> A + Send,
    R: FnOnce() -> B + Send,
    A: Send,
    B: Send,
{
    #[cfg(feature = "multithread")]
    {
        rayon::join(left, right)
    }
    #[cfg(not(feature = "multithread"))]
    {
        (left(), right())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_preserves_order() {
        let (a, b) = join_paths(|| 1 + 1, || "right");
        assert_eq!(a, 2);
        assert_eq!(b, "right");
    }
}

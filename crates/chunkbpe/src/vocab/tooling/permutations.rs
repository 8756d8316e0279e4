//! # Index Permutations
//!
//! Used to reorder work (such as candidate seeding) without changing its content.

use core::fmt::Debug;
use num_traits::{FromPrimitive, PrimInt};

/// Checks if a slice is a valid permutation.
pub fn try_check_permutation<T>(perm: &[T]) -> anyhow::Result<()>
where
    T: PrimInt + Debug,
{
    let n = perm.len();
    let mut target_counts: Vec<u8> = vec![0; n];

    for &x in perm {
        match x.to_usize() {
            Some(idx) if idx < n => target_counts[idx] = target_counts[idx].saturating_add(1),
            _ => anyhow::bail!("Bad {n}-permutation: {x:?} out of range\n{perm:?}"),
        }
    }

    if target_counts.iter().all(|&x| x == 1) {
        return Ok(());
    }

    let mut dups: Vec<usize> = Default::default();
    let mut missing: Vec<usize> = Default::default();
    for (target, &count) in target_counts.iter().enumerate() {
        if count > 1 {
            dups.push(target);
        } else if count < 1 {
            missing.push(target);
        }
    }

    anyhow::bail!(
        "Bad {n}-permutation: {:?} duplicated, {:?} missing\n{:?}",
        &dups,
        &missing,
        perm
    )
}

/// Computes the inverse permutation.
pub fn invert_permutation<T>(perm: &[T]) -> Vec<T>
where
    T: PrimInt + FromPrimitive + Debug,
{
    let mut inv = vec![T::zero(); perm.len()];

    for (idx, &target) in perm.iter().enumerate() {
        let inv_idx = target.to_usize().unwrap();
        let inv_target = T::from_usize(idx).unwrap();

        inv[inv_idx] = inv_target;
    }

    inv
}

/// Builds the permutation ``i -> (offset + i * stride) % n``.
///
/// # Errors
/// If `stride` is not coprime with `n`, which would not be a permutation.
pub fn try_stride_permutation(
    n: usize,
    stride: usize,
    offset: usize,
) -> anyhow::Result<Vec<usize>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let perm: Vec<usize> = (0..n)
        .map(|i| (offset % n + (i % n) * (stride % n)) % n)
        .collect();
    try_check_permutation(&perm)?;
    Ok(perm)
}

/// Reorders `items` so that ``result[i] = items[perm[i]]``.
pub fn apply_permutation<V: Clone>(
    items: &[V],
    perm: &[usize],
) -> Vec<V> {
    assert_eq!(items.len(), perm.len(), "permutation length mismatch");
    perm.iter().map(|&i| items[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_permutation() {
        assert!(try_check_permutation(&[0, 1, 2]).is_ok());
        assert!(try_check_permutation(&[2, 1, 0]).is_ok());

        assert_eq!(
            try_check_permutation(&[0, 2, 2]).err().unwrap().to_string(),
            "Bad 3-permutation: [2] duplicated, [1] missing\n[0, 2, 2]",
        );
        assert_eq!(
            try_check_permutation(&[0, 3, 1]).err().unwrap().to_string(),
            "Bad 3-permutation: 3 out of range\n[0, 3, 1]",
        );
    }

    #[test]
    fn test_invert_permutation() {
        assert_eq!(invert_permutation(&[0, 1, 2]), vec![0, 1, 2]);
        assert_eq!(invert_permutation(&[0, 2, 1]), vec![0, 2, 1]);
        assert_eq!(invert_permutation(&[1, 2, 0]), vec![2, 0, 1]);
    }

    #[test]
    fn test_stride_permutation() {
        assert_eq!(try_stride_permutation(5, 2, 0).unwrap(), vec![0, 2, 4, 1, 3]);
        assert_eq!(try_stride_permutation(4, 1, 3).unwrap(), vec![3, 0, 1, 2]);
        assert_eq!(try_stride_permutation(0, 3, 0).unwrap(), Vec::<usize>::new());
        assert!(try_stride_permutation(4, 2, 0).is_err());

        let perm = try_stride_permutation(7, 3, 1).unwrap();
        let inv = invert_permutation(&perm);
        assert_eq!(
            apply_permutation(&apply_permutation(&['a', 'b', 'c', 'd', 'e', 'f', 'g'], &perm), &inv),
            vec!['a', 'b', 'c', 'd', 'e', 'f', 'g']
        );
    }
}

//! Random selection of items that satisfy a predicate.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{AppError, EXIT_INPUT};

/// Pick `k` distinct items for which `accept` holds.
///
/// Items are drawn without replacement in batches of the remaining shortfall;
/// accepted draws are kept, rejected ones are never tested twice. Fails if
/// fewer than `k` items pass.
pub fn rejection_sample<T, R, F>(items: &[T], mut accept: F, k: usize, rng: &mut R) -> Result<BTreeSet<T>, AppError>
where
    T: Ord + Clone,
    R: Rng + ?Sized,
    F: FnMut(&T) -> bool,
{
    let distinct: BTreeSet<&T> = items.iter().collect();
    if k > distinct.len() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Cannot sample {k} items from {} candidates", distinct.len()),
        ));
    }

    let mut chosen = BTreeSet::new();
    let mut rejected = BTreeSet::new();

    while chosen.len() < k {
        if chosen.len() + rejected.len() == distinct.len() {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Only {} of {} candidates qualify; {k} requested", chosen.len(), distinct.len()),
            ));
        }

        for item in items.choose_multiple(rng, k - chosen.len()) {
            if chosen.contains(item) || rejected.contains(item) {
                continue;
            }
            if accept(item) {
                chosen.insert(item.clone());
            } else {
                rejected.insert(item.clone());
            }
        }
    }

    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn picks_k_accepted_items() {
        let items: Vec<u32> = (0..100).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let chosen = rejection_sample(&items, |n| n % 2 == 0, 10, &mut rng).unwrap();
        assert_eq!(chosen.len(), 10);
        assert!(chosen.iter().all(|n| n % 2 == 0));
    }

    #[test]
    fn zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let chosen = rejection_sample(&[1, 2, 3], |_| true, 0, &mut rng).unwrap();
        assert!(chosen.is_empty());
    }

    #[test]
    fn same_seed_same_sample() {
        let items: Vec<u32> = (0..50).collect();
        let a = rejection_sample(&items, |_| true, 5, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = rejection_sample(&items, |_| true, 5, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_requested_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(rejection_sample(&[1, 2], |_| true, 3, &mut rng).is_err());
    }

    #[test]
    fn too_few_qualifying_fails_instead_of_looping() {
        let items: Vec<u32> = (0..20).collect();
        let mut rng = StdRng::seed_from_u64(9);
        let err = rejection_sample(&items, |n| *n < 2, 3, &mut rng).unwrap_err();
        assert!(err.to_string().starts_with("Only 2 of 20"), "{err}");
    }
}

//! Numeric helpers used by the clue catalog and the scoring model
//!
//! Everything here is a pure function of its arguments.

/// Score every round starts from, and the ceiling of any final score
pub const BASE_SCORE: u32 = 1000;

/// Points lost per guess beyond the binary-search optimum
const GUESS_PENALTY: i64 = 100;

/// Points lost per elapsed second
const TIME_PENALTY_PER_SECOND: f64 = 2.0;

/// Primality test by trial division over the 6k±1 wheel
///
/// # Examples
/// ```
/// use guess_number::core::math::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(29));
/// assert!(!is_prime(1));
/// assert!(!is_prime(49));
/// ```
#[must_use]
pub const fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Sum of the base-10 digits of `n`
///
/// Negative inputs are summed over their absolute value. Secrets are drawn
/// from positive ranges, so the engine never relies on this.
#[must_use]
pub const fn digit_sum(n: i64) -> u32 {
    let mut rest = n.unsigned_abs();
    let mut sum = 0;
    while rest > 0 {
        sum += (rest % 10) as u32;
        rest /= 10;
    }
    sum
}

/// Midpoint of the current bounds, rounded down
///
/// This is the guess that halves the remaining interval. Exact for any pair
/// of bounds, including ones whose sum does not fit in an `i64`.
#[must_use]
pub const fn binary_search_pivot(low: i64, high: i64) -> i64 {
    (low as i128 + high as i128).div_euclid(2) as i64
}

/// `ceil(log2(size))` for a non-empty interval size
const fn ceil_log2(size: u64) -> u32 {
    if size <= 1 {
        0
    } else {
        u64::BITS - (size - 1).leading_zeros()
    }
}

/// Worst-case number of guesses an optimal binary search needs on `[min, max]`
///
/// # Examples
/// ```
/// use guess_number::core::math::expected_guess_count;
///
/// assert_eq!(expected_guess_count(1, 10), 4);
/// assert_eq!(expected_guess_count(1, 8), 3);
/// ```
#[must_use]
pub const fn expected_guess_count(min: i64, max: i64) -> u32 {
    ceil_log2(range_size(min, max))
}

/// Number of integers in `[min, max]`, or 0 for an empty interval
///
/// Saturates at `u64::MAX` for the full `i64` range.
#[must_use]
pub const fn range_size(min: i64, max: i64) -> u64 {
    if max < min {
        0
    } else {
        max.abs_diff(min).saturating_add(1)
    }
}

/// Score for a won round
///
/// `1000 - guess_penalty - clue_penalty - time_penalty`, floored at zero, where
/// the guess penalty is 100 per guess beyond `ceil(log2(range_size))` and the
/// time penalty is two points per elapsed second (rounded down).
///
/// The engine always passes `clue_penalty = 0`: clue costs are charged against
/// the running score while playing and do not carry into the final score.
#[must_use]
pub fn compute_score(
    guesses_taken: usize,
    range_size: u64,
    clue_penalty: u32,
    elapsed_seconds: f64,
) -> u32 {
    let expected = i64::from(ceil_log2(range_size));
    let guess_penalty = ((guesses_taken as i64 - expected) * GUESS_PENALTY).max(0);
    let time_penalty = (elapsed_seconds.max(0.0) * TIME_PENALTY_PER_SECOND).floor() as i64;

    let score = i64::from(BASE_SCORE) - guess_penalty - i64::from(clue_penalty) - time_penalty;
    score.clamp(0, i64::from(BASE_SCORE)) as u32
}

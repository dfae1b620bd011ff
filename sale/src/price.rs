use rct_common::{Balance, BlockNumber};

/// The leadin price-decay strategy. The engine treats the curve as a
/// pluggable collaborator; the default is linear decay.
pub trait LeadinCurve {
    /// The sale price `elapsed` blocks into a leadin of `leadin_length`
    /// blocks, for a cycle whose target (floor) price is `target`.
    ///
    /// Must start above `target` at `elapsed == 0` and reach `target` at
    /// `elapsed == leadin_length`.
    fn price_at(&self, target: Balance, elapsed: BlockNumber, leadin_length: BlockNumber)
        -> Balance;
}

/// Linear decay from twice the target price down to the target price,
/// matching the broker's `Linear` price adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearCurve;

impl LeadinCurve for LinearCurve {
    fn price_at(
        &self,
        target: Balance,
        elapsed: BlockNumber,
        leadin_length: BlockNumber,
    ) -> Balance {
        if leadin_length == 0 {
            return target;
        }
        let length = leadin_length as u128;
        let elapsed = (elapsed as u128).min(length);
        // price = target * (2 - elapsed / length), in integer arithmetic.
        (target as u128 * (2 * length - elapsed) / length) as Balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let curve = LinearCurve;
        assert_eq!(curve.price_at(100, 0, 10), 200);
        assert_eq!(curve.price_at(100, 10, 10), 100);
    }

    #[test]
    fn test_linear_is_monotonically_decreasing() {
        let curve = LinearCurve;
        let prices: Vec<_> = (0..=10).map(|t| curve.price_at(100, t, 10)).collect();
        assert_eq!(
            prices,
            vec![200, 190, 180, 170, 160, 150, 140, 130, 120, 110, 100]
        );
        assert!(prices.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_elapsed_is_clamped() {
        let curve = LinearCurve;
        assert_eq!(curve.price_at(100, 50, 10), 100);
    }

    #[test]
    fn test_large_prices_do_not_overflow() {
        let curve = LinearCurve;
        let target = Balance::MAX / 2;
        assert_eq!(curve.price_at(target, 0, 1_000), target * 2);
    }
}

//! Square of 9 ring generation and level selection
//!
//! The spiral is anchored at the square of the floored square root of the
//! reference price. Rings step the root outward along eight axes, cardinal
//! axes by the raw increment and diagonal axes by a 1.125 multiple of it,
//! and every ring is the squared root rounded to cents.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::types::{Axis, LevelError, LevelTarget, PriceLevels};
use crate::config::{ConfigError, GannConfig};
use crate::math::{floor_sqrt, round2, square};

/// Step multiplier for the four diagonal axes.
const DIAGONAL_STEP: f64 = 1.125;

/// Deterministic price-to-levels calculator.
///
/// Stateless: `calculate` depends only on the input price and the
/// configuration captured at construction, so identical inputs always yield
/// identical output and concurrent use needs no synchronization.
pub struct LevelEngine {
    increments: [f64; 8],
    values_per_axis: u32,
    include_lower: bool,
    num_targets: usize,
    buffer_fraction: Decimal,
}

impl LevelEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: &GannConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut increments = [0.0f64; 8];
        for (slot, increment) in increments.iter_mut().zip(&config.increments) {
            *slot = (*increment).try_into().unwrap_or(0.0);
        }

        Ok(Self {
            increments,
            values_per_axis: config.values_per_axis,
            include_lower: config.include_lower,
            num_targets: config.num_targets,
            buffer_fraction: config.buffer_fraction,
        })
    }

    /// Compute the full level set for a positive reference price.
    ///
    /// Returns an error when the price is not positive or when no ring
    /// straddles it; callers must treat either as "no signal computable"
    /// rather than substituting degenerate levels.
    pub fn calculate(&self, price: Decimal) -> Result<PriceLevels, LevelError> {
        if price <= Decimal::ZERO {
            return Err(LevelError::NonPositivePrice(price));
        }

        let price_f: f64 = price.try_into().unwrap_or(0.0);
        let rings = self.generate_axis_values(price_f);

        let (buy_above, sell_below) = self
            .find_straddle(price, &rings)
            .ok_or(LevelError::NoStraddle(price))?;

        let (buy_targets, sell_targets) =
            self.collect_targets(buy_above, &rings, price_f, sell_below);
        let (stop_loss_long, stop_loss_short) = self.stop_losses(buy_above, sell_below);

        tracing::debug!(%price, %buy_above, %sell_below, "levels computed");

        Ok(PriceLevels {
            input_price: price,
            buy_above,
            sell_below,
            buy_targets,
            sell_targets,
            stop_loss_long,
            stop_loss_short,
        })
    }

    /// Per-axis step size for the root.
    fn step(&self, axis: Axis) -> f64 {
        let increment = self.increments[axis.index()];
        if axis.is_cardinal() {
            increment
        } else {
            increment * DIAGONAL_STEP
        }
    }

    /// Ascending ring list per axis, bracketing the central square.
    fn generate_axis_values(&self, price: f64) -> [Vec<Decimal>; 8] {
        let base = floor_sqrt(price);
        let center = square(base);

        let mut rings: [Vec<Decimal>; 8] = Default::default();
        for axis in Axis::ALL {
            let step = self.step(axis);
            let list = &mut rings[axis.index()];

            if self.include_lower {
                for i in (1..=self.values_per_axis / 2).rev() {
                    let root = base - f64::from(i) * step;
                    if root > 0.0 {
                        list.push(round2(square(root)));
                    }
                }
            }

            list.push(round2(center));

            for i in 1..=self.values_per_axis {
                let root = base + f64::from(i) * step;
                list.push(round2(square(root)));
            }
        }
        rings
    }

    /// Nearest rings straddling `price` on the 0-degree axis.
    ///
    /// A ring equal to the price belongs to neither side.
    fn find_straddle(
        &self,
        price: Decimal,
        rings: &[Vec<Decimal>; 8],
    ) -> Option<(Decimal, Decimal)> {
        let mut above: Option<Decimal> = None;
        let mut below: Option<Decimal> = None;

        for &value in &rings[Axis::Deg0.index()] {
            if value > price && above.map_or(true, |a| value < a) {
                above = Some(value);
            }
            if value < price && below.map_or(true, |b| value > b) {
                below = Some(value);
            }
        }

        Some((above?, below?))
    }

    /// Pick at most one target per axis on each side, deduplicated by exact
    /// price across axes, sorted and capped.
    fn collect_targets(
        &self,
        entry_above: Decimal,
        rings: &[Vec<Decimal>; 8],
        current_price: f64,
        sell_below: Decimal,
    ) -> (Vec<LevelTarget>, Vec<LevelTarget>) {
        let mut used: HashSet<Decimal> = HashSet::new();
        let mut buy_targets = Vec::new();
        for axis in Axis::ALL {
            let pick = rings[axis.index()]
                .iter()
                .copied()
                .filter(|v| *v > entry_above && !used.contains(v))
                .min();
            if let Some(price) = pick {
                used.insert(price);
                buy_targets.push(LevelTarget { axis, price });
            }
        }
        buy_targets.sort_by(|a, b| a.price.cmp(&b.price));
        buy_targets.truncate(self.num_targets);

        let mut used: HashSet<Decimal> = HashSet::new();
        let mut sell_targets = Vec::new();
        // The center is re-derived from the live price, which may sit in a
        // different square than the reference close.
        let center = round2(square(floor_sqrt(current_price)));
        if center < sell_below {
            used.insert(center);
            sell_targets.push(LevelTarget {
                axis: Axis::Deg0,
                price: center,
            });
        }
        for axis in Axis::ALL {
            let pick = rings[axis.index()]
                .iter()
                .copied()
                .filter(|v| *v < sell_below && !used.contains(v))
                .max();
            if let Some(price) = pick {
                used.insert(price);
                sell_targets.push(LevelTarget { axis, price });
            }
        }
        sell_targets.sort_by(|a, b| b.price.cmp(&a.price));
        sell_targets.truncate(self.num_targets);

        (buy_targets, sell_targets)
    }

    /// Stops sit a buffer beyond the opposite straddle level.
    fn stop_losses(&self, buy_above: Decimal, sell_below: Decimal) -> (Decimal, Decimal) {
        let long = (sell_below * (Decimal::ONE - self.buffer_fraction)).round_dp(2);
        let short = (buy_above * (Decimal::ONE + self.buffer_fraction)).round_dp(2);
        (long, short)
    }
}

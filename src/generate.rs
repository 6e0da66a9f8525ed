//! Deterministic pseudo-random order stream for PR mode.
//!
//! Two generators built from the same parameters produce identical order
//! sequences, so a PR run is as reproducible as a trade-list file.
//!
//! - Inter-arrival gaps are drawn from `Exp(rate)` and accumulated into a
//!   non-decreasing integer clock; a high arrival rate packs many orders
//!   into each timestamp.
//! - Side is a fair coin; trader and stock ids are uniform over the declared
//!   bounds; price and quantity are uniform in `1..=100`, so every generated
//!   order satisfies the input contract by construction.

use crate::feed::GenParams;
use crate::orders::{Order, Side};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Exp};

pub struct Generator {
    rng: StdRng,
    gaps: Exp<f64>,
    remaining: u32,
    clock: u32,
    num_traders: u32,
    num_stocks: u32,
}

impl Generator {
    pub fn new(params: GenParams, num_traders: u32, num_stocks: u32) -> Self {
        let rate = f64::from(params.arrival_rate.max(1));
        Self {
            rng: StdRng::seed_from_u64(params.seed),
            gaps: Exp::new(rate).expect("arrival rate must be positive"),
            remaining: params.num_orders,
            clock: 0,
            num_traders,
            num_stocks,
        }
    }
}

impl Iterator for Generator {
    type Item = Order;

    fn next(&mut self) -> Option<Order> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        self.clock += self.gaps.sample(&mut self.rng) as u32;
        let side = if self.rng.random_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };

        Some(Order {
            timestamp: self.clock,
            side,
            trader: self.rng.random_range(0..self.num_traders),
            stock: self.rng.random_range(0..self.num_stocks),
            price: self.rng.random_range(1..=100),
            quantity: self.rng.random_range(1..=100),
        })
    }
}

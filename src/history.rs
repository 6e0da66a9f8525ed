use crate::orders::Side;
use tracing::debug;

/// One submitted order's `(timestamp, price)`, recorded whether or not the
/// order ever traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quote {
    pub timestamp: u32,
    pub price: u32,
}

/// The best hindsight round trip for one stock.
///
/// Named from the time traveler's point of view: they **buy** where a sell
/// quote appeared and **sell** where a later buy quote appeared, so the
/// fields are inverted relative to the order sides they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opportunity {
    pub buy_time: u32,
    pub buy_price: u32,
    pub sell_time: u32,
    pub sell_price: u32,
}

impl Opportunity {
    pub fn profit(&self) -> u32 {
        self.sell_price - self.buy_price
    }
}

/// Append-only record of every submitted order's quote, per stock and side.
///
/// Fill outcomes are irrelevant here: the time-traveler analysis runs over
/// the full historical quote set, not over what actually matched.
pub struct QuoteHistory {
    buys: Vec<Vec<Quote>>,
    sells: Vec<Vec<Quote>>,
}

impl QuoteHistory {
    pub fn new(num_stocks: u32) -> Self {
        Self {
            buys: vec![Vec::new(); num_stocks as usize],
            sells: vec![Vec::new(); num_stocks as usize],
        }
    }

    pub fn record(&mut self, stock: u32, side: Side, timestamp: u32, price: u32) {
        let quotes = match side {
            Side::Buy => &mut self.buys[stock as usize],
            Side::Sell => &mut self.sells[stock as usize],
        };
        quotes.push(Quote { timestamp, price });
    }

    /// Sorts every per-stock, per-side sequence by (timestamp, price).
    /// Call once after the input stream is exhausted, before analysis.
    pub fn finalize(&mut self) {
        for quotes in self.buys.iter_mut().chain(self.sells.iter_mut()) {
            quotes.sort_unstable();
        }
    }

    pub fn quotes(&self, stock: u32, side: Side) -> &[Quote] {
        match side {
            Side::Buy => &self.buys[stock as usize],
            Side::Sell => &self.sells[stock as usize],
        }
    }

    /// Finds the maximum-profit hindsight trade for `stock`: a sell quote
    /// `(t_s, p_s)` and a strictly later buy quote `(t_b, p_b)` with
    /// `p_b > p_s`, maximizing `p_b - p_s`.
    ///
    /// Among maximal-profit pairs the tie-break is lexicographic on
    /// `(t_s, t_b)`: earliest entry time, then earliest exit time.
    ///
    /// Quadratic in the number of quotes; runs once per stock as a batch
    /// post-process, never on the matching path.
    pub fn best_opportunity(&self, stock: u32) -> Option<Opportunity> {
        let sells = &self.sells[stock as usize];
        let buys = &self.buys[stock as usize];
        debug!(stock, sells = sells.len(), buys = buys.len(), "hindsight scan");

        let mut best: Option<Opportunity> = None;
        for sell in sells {
            for buy in buys {
                if buy.timestamp <= sell.timestamp || buy.price <= sell.price {
                    continue;
                }
                let candidate = Opportunity {
                    buy_time: sell.timestamp,
                    buy_price: sell.price,
                    sell_time: buy.timestamp,
                    sell_price: buy.price,
                };
                best = match best {
                    None => Some(candidate),
                    Some(current) => {
                        let better = candidate.profit() > current.profit()
                            || (candidate.profit() == current.profit()
                                && (candidate.buy_time < current.buy_time
                                    || (candidate.buy_time == current.buy_time
                                        && candidate.sell_time < current.sell_time)));
                        Some(if better { candidate } else { current })
                    }
                };
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(sells: &[(u32, u32)], buys: &[(u32, u32)]) -> QuoteHistory {
        let mut h = QuoteHistory::new(1);
        for &(t, p) in sells {
            h.record(0, Side::Sell, t, p);
        }
        for &(t, p) in buys {
            h.record(0, Side::Buy, t, p);
        }
        h.finalize();
        h
    }

    #[test]
    fn picks_maximum_profit_pair() {
        // sell quote at (1, $10); buy quotes at (5, $50) and (2, $5)
        let h = history(&[(1, 10)], &[(5, 50), (2, 5)]);
        assert_eq!(
            h.best_opportunity(0),
            Some(Opportunity {
                buy_time: 1,
                buy_price: 10,
                sell_time: 5,
                sell_price: 50,
            })
        );
    }

    #[test]
    fn exit_must_be_strictly_later() {
        let h = history(&[(3, 10)], &[(3, 50), (2, 90)]);
        assert_eq!(h.best_opportunity(0), None);
    }

    #[test]
    fn no_opportunity_without_positive_profit() {
        // every later buy quote is at or below the sell quote's price
        let h = history(&[(0, 50)], &[(1, 50), (2, 40)]);
        assert_eq!(h.best_opportunity(0), None);
    }

    #[test]
    fn no_opportunity_when_one_side_empty() {
        let h = history(&[(0, 10)], &[]);
        assert_eq!(h.best_opportunity(0), None);
        let h = history(&[], &[(0, 10)]);
        assert_eq!(h.best_opportunity(0), None);
    }

    #[test]
    fn equal_profit_prefers_earliest_entry_then_exit() {
        // two disjoint $10 opportunities; the (t_s=1, t_b=2) pair wins
        let h = history(&[(1, 20), (5, 10)], &[(2, 30), (6, 20)]);
        assert_eq!(
            h.best_opportunity(0),
            Some(Opportunity {
                buy_time: 1,
                buy_price: 20,
                sell_time: 2,
                sell_price: 30,
            })
        );

        // same entry time and profit, different exits: earliest exit wins
        let h = history(&[(1, 20)], &[(5, 30), (3, 30)]);
        assert_eq!(
            h.best_opportunity(0),
            Some(Opportunity {
                buy_time: 1,
                buy_price: 20,
                sell_time: 3,
                sell_price: 30,
            })
        );
    }

    #[test]
    fn records_are_kept_per_side() {
        let mut h = QuoteHistory::new(2);
        h.record(0, Side::Buy, 1, 10);
        h.record(1, Side::Sell, 2, 20);
        h.finalize();
        assert_eq!(h.quotes(0, Side::Buy).len(), 1);
        assert_eq!(h.quotes(0, Side::Sell).len(), 0);
        assert_eq!(h.quotes(1, Side::Sell).len(), 1);
    }
}

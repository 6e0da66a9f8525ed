use crate::trade::Trade;

/// Cumulative activity of one trader across all of their trades.
///
/// `net_transfer` is signed cash flow: negative = net payer (bought more
/// value than sold), positive = net receiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ledger {
    pub bought: u64,
    pub sold: u64,
    pub net_transfer: i64,
}

/// Accumulates per-stock trade prices (for running-median reporting) and
/// per-trader ledgers.
///
/// Trader and stock ids are small bounded integers, so both tables are dense
/// `Vec`s indexed by id; a trader that never trades reports an all-zero
/// ledger.
pub struct Statistics {
    /// Per stock, every realized trade price, kept sorted ascending.
    prices: Vec<Vec<u32>>,
    ledgers: Vec<Ledger>,
}

impl Statistics {
    pub fn new(num_traders: u32, num_stocks: u32) -> Self {
        Self {
            prices: vec![Vec::new(); num_stocks as usize],
            ledgers: vec![Ledger::default(); num_traders as usize],
        }
    }

    /// Folds one trade into the price history and both traders' ledgers.
    pub fn record_trade(&mut self, trade: &Trade) {
        let prices = &mut self.prices[trade.stock as usize];
        let pos = prices.partition_point(|&p| p <= trade.price);
        prices.insert(pos, trade.price);

        let value = trade.value();
        {
            let buyer = &mut self.ledgers[trade.buyer as usize];
            buyer.bought += u64::from(trade.quantity);
            buyer.net_transfer -= value;
        }
        {
            let seller = &mut self.ledgers[trade.seller as usize];
            seller.sold += u64::from(trade.quantity);
            seller.net_transfer += value;
        }
    }

    /// Median of all trade prices recorded for `stock` so far, or `None` if
    /// it has not traded. Cumulative, never windowed or reset. An even count
    /// averages the two middle values with floor division.
    pub fn median(&self, stock: u32) -> Option<u32> {
        let prices = &self.prices[stock as usize];
        if prices.is_empty() {
            return None;
        }
        let mid = prices.len() / 2;
        let median = if prices.len() % 2 == 0 {
            ((u64::from(prices[mid - 1]) + u64::from(prices[mid])) / 2) as u32
        } else {
            prices[mid]
        };
        Some(median)
    }

    pub fn ledger(&self, trader: u32) -> Ledger {
        self.ledgers[trader as usize]
    }

    /// All ledgers in trader-id order.
    pub fn ledgers(&self) -> &[Ledger] {
        &self.ledgers
    }
}

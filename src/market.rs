use crate::{
    errors::MarketError,
    history::QuoteHistory,
    orderbook::Book,
    orders::Order,
    stats::Statistics,
};
use std::io::{self, Write};
use tracing::info;

/// Which derived reports to emit. Toggles only gate output: they never
/// change matching results, counters, ledgers, or recorded history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reports {
    /// Narrate every executed trade.
    pub verbose: bool,
    /// Running median trade price per stock, on every timestamp advance.
    pub median: bool,
    /// Per-trader summary at end of day.
    pub trader_info: bool,
    /// Hindsight best-trade analysis per stock at end of day.
    pub time_travelers: bool,
}

/// The market engine: one instance owns all run-scoped state (per-stock
/// books, statistics, quote history, trade counter) for the process
/// lifetime.
///
/// Processing is strictly sequential; the same input stream always produces
/// byte-identical output.
pub struct Market {
    num_traders: u32,
    num_stocks: u32,
    reports: Reports,
    books: Vec<Book>,
    stats: Statistics,
    history: QuoteHistory,
    trades_completed: u64,
    clock: u32,
}

impl Market {
    pub fn new(num_traders: u32, num_stocks: u32, reports: Reports) -> Self {
        Self {
            num_traders,
            num_stocks,
            reports,
            books: (0..num_stocks).map(|_| Book::new()).collect(),
            stats: Statistics::new(num_traders, num_stocks),
            history: QuoteHistory::new(num_stocks),
            trades_completed: 0,
            clock: 0,
        }
    }

    /// Consumes the whole order stream, then emits the end-of-day reports.
    ///
    /// The first stream error aborts the run immediately; whatever was
    /// already written stays written, but nothing further is emitted.
    pub fn process<I, W>(&mut self, orders: I, out: &mut W) -> Result<(), MarketError>
    where
        I: IntoIterator<Item = Result<Order, MarketError>>,
        W: Write,
    {
        for order in orders {
            self.submit(order?, out)?;
        }
        self.finish(out)?;
        Ok(())
    }

    /// Feeds one already-validated order through the engine: advances the
    /// reporting clock, records the quote, matches against the book, and
    /// folds any trades into the aggregates.
    pub fn submit<W: Write>(&mut self, order: Order, out: &mut W) -> io::Result<()> {
        if order.timestamp != self.clock {
            if self.reports.median {
                self.write_medians(out)?;
            }
            self.clock = order.timestamp;
        }

        self.history
            .record(order.stock, order.side, order.timestamp, order.price);

        let trades = self.books[order.stock as usize].submit(order);
        self.trades_completed += trades.len() as u64;
        for trade in &trades {
            self.stats.record_trade(trade);
            if self.reports.verbose {
                writeln!(
                    out,
                    "Trader {} purchased {} shares of Stock {} from Trader {} for ${}/share",
                    trade.buyer, trade.quantity, trade.stock, trade.seller, trade.price
                )?;
            }
        }
        Ok(())
    }

    /// End-of-stream reporting: final medians, the trade count, and the
    /// enabled summaries. The quote history is finalized here whether or not
    /// the time-traveler report is enabled, so recorded history never
    /// depends on the toggles.
    pub fn finish<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.reports.median {
            self.write_medians(out)?;
        }
        info!(trades = self.trades_completed, "end of day");
        writeln!(out, "---End of Day---")?;
        writeln!(out, "Trades Completed: {}", self.trades_completed)?;

        if self.reports.trader_info {
            self.write_trader_info(out)?;
        }

        self.history.finalize();
        if self.reports.time_travelers {
            self.write_time_travelers(out)?;
        }
        Ok(())
    }

    fn write_medians<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for stock in 0..self.num_stocks {
            if let Some(median) = self.stats.median(stock) {
                writeln!(
                    out,
                    "Median match price of Stock {stock} at time {} is ${median}",
                    self.clock
                )?;
            }
        }
        Ok(())
    }

    fn write_trader_info<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "---Trader Info---")?;
        for trader in 0..self.num_traders {
            let ledger = self.stats.ledger(trader);
            writeln!(
                out,
                "Trader {trader} bought {} and sold {} for a net transfer of ${}",
                ledger.bought, ledger.sold, ledger.net_transfer
            )?;
        }
        Ok(())
    }

    fn write_time_travelers<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "---Time Travelers---")?;
        for stock in 0..self.num_stocks {
            match self.history.best_opportunity(stock) {
                Some(op) => writeln!(
                    out,
                    "A time traveler would buy Stock {stock} at time {} for ${} and sell it at time {} for ${}",
                    op.buy_time, op.buy_price, op.sell_time, op.sell_price
                )?,
                None => writeln!(
                    out,
                    "A time traveler could not make a profit on Stock {stock}"
                )?,
            }
        }
        Ok(())
    }

    pub fn trades_completed(&self) -> u64 {
        self.trades_completed
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn history(&self) -> &QuoteHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::Side;

    fn order(timestamp: u32, side: Side, trader: u32, stock: u32, price: u32, quantity: u32) -> Order {
        Order {
            timestamp,
            side,
            trader,
            stock,
            price,
            quantity,
        }
    }

    fn run(reports: Reports, orders: &[Order]) -> (Market, String) {
        let mut market = Market::new(3, 2, reports);
        let mut out = Vec::new();
        market
            .process(orders.iter().copied().map(Ok), &mut out)
            .unwrap();
        (market, String::from_utf8(out).unwrap())
    }

    fn sample_day() -> Vec<Order> {
        vec![
            order(0, Side::Sell, 0, 0, 100, 10),
            order(1, Side::Buy, 1, 0, 105, 5),
            order(2, Side::Buy, 2, 0, 95, 3),
            order(3, Side::Sell, 1, 1, 50, 2),
            order(4, Side::Buy, 0, 1, 50, 2),
            order(5, Side::Buy, 2, 0, 100, 8),
        ]
    }

    #[test]
    fn counts_one_trade_per_match_event() {
        let (market, _) = run(Reports::default(), &sample_day());
        assert_eq!(market.trades_completed(), 3);
    }

    #[test]
    fn quiet_run_reports_only_end_of_day() {
        let (_, out) = run(Reports::default(), &sample_day());
        assert_eq!(out, "---End of Day---\nTrades Completed: 3\n");
    }

    #[test]
    fn verbose_narrates_each_trade() {
        let reports = Reports {
            verbose: true,
            ..Reports::default()
        };
        let (_, out) = run(reports, &sample_day());
        let expected = "\
Trader 1 purchased 5 shares of Stock 0 from Trader 0 for $100/share
Trader 0 purchased 2 shares of Stock 1 from Trader 1 for $50/share
Trader 2 purchased 5 shares of Stock 0 from Trader 0 for $100/share
---End of Day---
Trades Completed: 3
";
        assert_eq!(out, expected);
    }

    #[test]
    fn median_reports_on_every_timestamp_advance() {
        let reports = Reports {
            median: true,
            ..Reports::default()
        };
        let (_, out) = run(reports, &sample_day());
        let expected = "\
Median match price of Stock 0 at time 1 is $100
Median match price of Stock 0 at time 2 is $100
Median match price of Stock 0 at time 3 is $100
Median match price of Stock 0 at time 4 is $100
Median match price of Stock 1 at time 4 is $50
Median match price of Stock 0 at time 5 is $100
Median match price of Stock 1 at time 5 is $50
---End of Day---
Trades Completed: 3
";
        assert_eq!(out, expected);
    }

    #[test]
    fn trader_info_lists_every_trader_in_id_order() {
        let reports = Reports {
            trader_info: true,
            ..Reports::default()
        };
        let (_, out) = run(reports, &sample_day());
        let expected = "\
---End of Day---
Trades Completed: 3
---Trader Info---
Trader 0 bought 2 and sold 10 for a net transfer of $900
Trader 1 bought 5 and sold 2 for a net transfer of $-400
Trader 2 bought 5 and sold 0 for a net transfer of $-500
";
        assert_eq!(out, expected);
    }

    #[test]
    fn time_traveler_report_covers_every_stock() {
        let reports = Reports {
            time_travelers: true,
            ..Reports::default()
        };
        let (_, out) = run(reports, &sample_day());
        let expected = "\
---End of Day---
Trades Completed: 3
---Time Travelers---
A time traveler would buy Stock 0 at time 0 for $100 and sell it at time 1 for $105
A time traveler could not make a profit on Stock 1
";
        assert_eq!(out, expected);
    }

    #[test]
    fn toggles_do_not_change_results() {
        let everything = Reports {
            verbose: true,
            median: true,
            trader_info: true,
            time_travelers: true,
        };
        let (quiet, _) = run(Reports::default(), &sample_day());
        let (loud, _) = run(everything, &sample_day());

        assert_eq!(quiet.trades_completed(), loud.trades_completed());
        assert_eq!(quiet.stats().ledgers(), loud.stats().ledgers());
        for stock in 0..2 {
            for side in [Side::Buy, Side::Sell] {
                assert_eq!(
                    quiet.history().quotes(stock, side),
                    loud.history().quotes(stock, side)
                );
            }
        }
        assert_eq!(
            quiet.history().best_opportunity(0),
            loud.history().best_opportunity(0)
        );
    }

    #[test]
    fn stream_error_stops_processing() {
        let mut market = Market::new(3, 2, Reports::default());
        let mut out = Vec::new();
        let orders = vec![
            Ok(order(0, Side::Sell, 0, 0, 100, 10)),
            Err(MarketError::TimestampRegression {
                previous: 5,
                current: 3,
            }),
            Ok(order(5, Side::Buy, 1, 0, 105, 5)),
        ];
        let result = market.process(orders, &mut out);
        assert!(matches!(
            result,
            Err(MarketError::TimestampRegression { .. })
        ));
        // no end-of-day output, no trades
        assert!(out.is_empty());
        assert_eq!(market.trades_completed(), 0);
    }
}

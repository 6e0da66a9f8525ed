use crate::{
    orders::{Order, Side},
    trade::Trade,
};
use std::{cmp::Ordering, collections::BinaryHeap};
use tracing::debug;

/// A [`Book`] stores the **active** buy and sell orders for one stock in two
/// separate [`BinaryHeap`]s:
/// - `bids` (buy orders), best = highest price
/// - `asks` (sell orders), best = lowest price
///
/// Each heap's ordering breaks price ties by **earliest timestamp**, so
/// price-time priority is a property of the ordering itself rather than of
/// insertion order. A partially filled resting order is re-pushed with its
/// original timestamp and therefore keeps its place in line.
pub struct Book {
    bids: BinaryHeap<Bid>,
    asks: BinaryHeap<Ask>,
}

/// Heap entry for the bid side: greater = higher price, then earlier time.
#[derive(Debug, Clone, Copy)]
struct Bid(Order);

/// Heap entry for the ask side: greater = lower price, then earlier time.
#[derive(Debug, Clone, Copy)]
struct Ask(Order);

impl Ord for Bid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .price
            .cmp(&other.0.price)
            .then_with(|| other.0.timestamp.cmp(&self.0.timestamp))
    }
}

impl Ord for Ask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .price
            .cmp(&self.0.price)
            .then_with(|| other.0.timestamp.cmp(&self.0.timestamp))
    }
}

impl PartialOrd for Bid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialOrd for Ask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Bid {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialEq for Ask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Bid {}
impl Eq for Ask {}

/// Internal trait to unify matching against either heap.
///
/// Mirrors the bid/ask asymmetry in one place: how an order is wrapped for
/// its side's heap, and whether a resting price is acceptable to an incoming
/// order with the given limit.
trait Resting: Ord + Sized {
    fn wrap(order: Order) -> Self;
    fn order(&self) -> &Order;
    fn into_order(self) -> Order;
    fn crosses(&self, limit: u32) -> bool;
}

impl Resting for Bid {
    fn wrap(order: Order) -> Self {
        Bid(order)
    }
    fn order(&self) -> &Order {
        &self.0
    }
    fn into_order(self) -> Order {
        self.0
    }
    /// A resting bid is acceptable to an incoming sell at or below its price.
    fn crosses(&self, limit: u32) -> bool {
        self.0.price >= limit
    }
}

impl Resting for Ask {
    fn wrap(order: Order) -> Self {
        Ask(order)
    }
    fn order(&self) -> &Order {
        &self.0
    }
    fn into_order(self) -> Order {
        self.0
    }
    /// A resting ask is acceptable to an incoming buy at or above its price.
    fn crosses(&self, limit: u32) -> bool {
        self.0.price <= limit
    }
}

/// Matches an **incoming order** against the opposing side of the book,
/// potentially producing a series of [`Trade`]s.
///
/// # Notes
/// - Supports **partial fills**: the fill quantity is
///   `min(incoming.quantity, resting.quantity)`, so neither order can
///   overfill, and one incoming order may sweep several resting orders.
/// - The trade executes at the **resting order's price**.
/// - A resting remainder goes back onto the heap with its original
///   timestamp, preserving its time priority.
fn match_incoming_side<R: Resting>(incoming: &mut Order, book_side: &mut BinaryHeap<R>) -> Vec<Trade> {
    debug!(?incoming, "matching incoming order");
    let mut trades = Vec::new();

    while incoming.quantity > 0 {
        let Some(best) = book_side.peek() else {
            break;
        };
        if !best.crosses(incoming.price) {
            break;
        }
        let mut resting = match book_side.pop() {
            Some(entry) => entry.into_order(),
            None => break,
        };

        let trade_qty = incoming.quantity.min(resting.quantity);
        incoming.quantity -= trade_qty;
        resting.quantity -= trade_qty;

        let (buyer, seller) = match incoming.side {
            Side::Buy => (incoming.trader, resting.trader),
            Side::Sell => (resting.trader, incoming.trader),
        };
        trades.push(Trade {
            stock: incoming.stock,
            price: resting.price,
            quantity: trade_qty,
            buyer,
            seller,
        });

        if resting.quantity > 0 {
            book_side.push(R::wrap(resting));
        }
    }

    debug!(trades = trades.len(), "matching complete");
    trades
}

impl Book {
    /// Creates a new, empty [`Book`], with no active bids or asks.
    pub fn new() -> Self {
        Self {
            bids: BinaryHeap::new(),
            asks: BinaryHeap::new(),
        }
    }

    /// Submits an order: crosses it against the opposing side as far as its
    /// limit price allows, then rests any unfilled remainder on its own side.
    ///
    /// Returns a [`Vec<Trade>`] describing all full or partial matches that
    /// occurred, in execution order.
    pub fn submit(&mut self, mut incoming: Order) -> Vec<Trade> {
        let trades = match incoming.side {
            Side::Buy => match_incoming_side(&mut incoming, &mut self.asks),
            Side::Sell => match_incoming_side(&mut incoming, &mut self.bids),
        };
        if incoming.quantity > 0 {
            match incoming.side {
                Side::Buy => self.bids.push(Bid(incoming)),
                Side::Sell => self.asks.push(Ask(incoming)),
            }
        }
        trades
    }

    /// Highest resting bid price, if any.
    pub fn best_bid(&self) -> Option<u32> {
        self.bids.peek().map(|b| b.order().price)
    }

    /// Lowest resting ask price, if any.
    pub fn best_ask(&self) -> Option<u32> {
        self.asks.peek().map(|a| a.order().price)
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

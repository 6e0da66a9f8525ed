/// A trade represents a matched transaction between two orders.
///
/// # Terminology
/// - **Resting order**: the order that was already in the book (providing liquidity).
/// - **Incoming order**: the newly submitted order that triggered the trade.
///
/// # Behavior
/// - The trade always executes at the **resting order's price**, so price
///   improvement favors the side that was already waiting.
/// - Partial fills may occur: one incoming order can generate several trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trade {
    pub stock: u32,
    pub price: u32,
    pub quantity: u32,
    pub buyer: u32,
    pub seller: u32,
}

impl Trade {
    /// Cash that changes hands: debited from the buyer, credited to the seller.
    pub fn value(&self) -> i64 {
        i64::from(self.price) * i64::from(self.quantity)
    }
}

/// Represents which side of the market the order is on.
///
/// # Intuition
/// - `Buy` (Bid): The trader wants to purchase shares. Buy orders rank from **highest to lowest price**
///   because a higher price means more willingness to buy — i.e., more aggressive.
/// - `Sell` (Ask): The trader wants to sell shares. Sell orders rank from **lowest to highest price**
///   because a lower price means more willingness to sell — i.e., more aggressive.
///
/// This ranking ensures the matching engine always finds the **best price first**:
/// - Buyers match with the **lowest ask**
/// - Sellers match with the **highest bid**
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,  // Bid
    Sell, // Ask
}

/// An order submitted by a trader.
///
/// - `timestamp` is the integer arrival time from the input stream; it drives
///   time-priority within a price level and never changes, even when the
///   order rests partially filled.
/// - `quantity` is the remaining unfilled quantity and only ever decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub timestamp: u32,
    pub side: Side,
    pub trader: u32,
    pub stock: u32,
    pub price: u32,
    pub quantity: u32,
}

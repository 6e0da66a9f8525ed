use thiserror::Error;

/// Fatal conditions raised while ingesting the order stream.
///
/// Every variant aborts the whole run: once the input contract is broken,
/// matching correctness can no longer be guaranteed, so there is no
/// best-effort recovery path.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Timestamps must be non-decreasing (read {current} after {previous})")]
    TimestampRegression { previous: u32, current: u32 },

    #[error("Invalid trader ID {0}")]
    InvalidTrader(u32),

    #[error("Invalid stock ID {0}")]
    InvalidStock(u32),

    #[error("Price and quantity must be positive")]
    NonPositive,

    #[error("Malformed order line: {0:?}")]
    MalformedOrder(String),

    #[error("Malformed input header: {0}")]
    MalformedHeader(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

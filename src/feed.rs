//! Input-side collaborators: header parsing, order-line tokenization, and
//! the input-contract validator.
//!
//! The engine core only ever sees an already-validated [`Order`]; everything
//! in this module fails fast with a [`MarketError`] because matching
//! correctness cannot be guaranteed once the input contract is broken.

use crate::errors::MarketError;
use crate::orders::{Order, Side};
use std::io::BufRead;

/// Where the order stream comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Orders follow the header, one per line.
    TradeList,
    /// Orders are synthesized deterministically from the given parameters.
    PseudoRandom(GenParams),
}

/// Parameters for the pseudo-random order stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenParams {
    pub seed: u64,
    pub num_orders: u32,
    pub arrival_rate: u32,
}

/// Parsed input header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub mode: Mode,
    pub num_traders: u32,
    pub num_stocks: u32,
}

fn read_header_line<R: BufRead>(input: &mut R) -> Result<String, MarketError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(MarketError::MalformedHeader("unexpected end of input".into()));
    }
    Ok(line.trim_end().to_string())
}

fn header_field<R: BufRead>(input: &mut R, key: &str) -> Result<String, MarketError> {
    let line = read_header_line(input)?;
    line.strip_prefix(key)
        .map(|rest| rest.trim().to_string())
        .ok_or_else(|| MarketError::MalformedHeader(format!("expected `{key}` line, got {line:?}")))
}

fn header_number<R: BufRead, T: std::str::FromStr>(
    input: &mut R,
    key: &str,
) -> Result<T, MarketError> {
    let value = header_field(input, key)?;
    value
        .parse()
        .map_err(|_| MarketError::MalformedHeader(format!("`{key}` is not a number: {value:?}")))
}

/// Reads the stream header:
///
/// ```text
/// COMMENT: <free text>
/// MODE: TL | PR
/// NUM_TRADERS: <n>
/// NUM_STOCKS: <n>
/// ```
///
/// PR mode carries three more lines: `RANDOM_SEED:`, `NUMBER_OF_ORDERS:`
/// and `ARRIVAL_RATE:`.
pub fn read_header<R: BufRead>(input: &mut R) -> Result<Header, MarketError> {
    let _comment = read_header_line(input)?;
    let mode_tag = header_field(input, "MODE:")?;
    let num_traders = header_number(input, "NUM_TRADERS:")?;
    let num_stocks = header_number(input, "NUM_STOCKS:")?;

    let mode = match mode_tag.as_str() {
        "TL" => Mode::TradeList,
        "PR" => Mode::PseudoRandom(GenParams {
            seed: header_number(input, "RANDOM_SEED:")?,
            num_orders: header_number(input, "NUMBER_OF_ORDERS:")?,
            arrival_rate: header_number(input, "ARRIVAL_RATE:")?,
        }),
        other => {
            return Err(MarketError::MalformedHeader(format!(
                "unknown mode {other:?}"
            )));
        }
    };

    Ok(Header {
        mode,
        num_traders,
        num_stocks,
    })
}

fn strip_tag<'a>(token: Option<&'a str>, tag: char, line: &str) -> Result<&'a str, MarketError> {
    token
        .and_then(|t| t.strip_prefix(tag))
        .ok_or_else(|| MarketError::MalformedOrder(line.to_string()))
}

fn parse_number<T: std::str::FromStr>(token: &str, line: &str) -> Result<T, MarketError> {
    token
        .parse()
        .map_err(|_| MarketError::MalformedOrder(line.to_string()))
}

/// Tokenizes one order line of the form
/// `<timestamp> BUY|SELL T<trader> S<stock> $<price> #<quantity>`.
pub fn parse_order(line: &str) -> Result<Order, MarketError> {
    let mut tokens = line.split_whitespace();
    let malformed = || MarketError::MalformedOrder(line.to_string());

    let timestamp = parse_number(tokens.next().ok_or_else(malformed)?, line)?;
    let side = match tokens.next().ok_or_else(malformed)? {
        "BUY" => Side::Buy,
        "SELL" => Side::Sell,
        _ => return Err(malformed()),
    };
    let trader = parse_number(strip_tag(tokens.next(), 'T', line)?, line)?;
    let stock = parse_number(strip_tag(tokens.next(), 'S', line)?, line)?;
    let price = parse_number(strip_tag(tokens.next(), '$', line)?, line)?;
    let quantity = parse_number(strip_tag(tokens.next(), '#', line)?, line)?;
    if tokens.next().is_some() {
        return Err(malformed());
    }

    Ok(Order {
        timestamp,
        side,
        trader,
        stock,
        price,
        quantity,
    })
}

/// Enforces the input contract the engine core relies on: non-decreasing
/// timestamps, in-bounds trader and stock ids, positive price and quantity.
#[derive(Debug)]
pub struct Validator {
    num_traders: u32,
    num_stocks: u32,
    last_timestamp: u32,
}

impl Validator {
    pub fn new(num_traders: u32, num_stocks: u32) -> Self {
        Self {
            num_traders,
            num_stocks,
            last_timestamp: 0,
        }
    }

    pub fn check(&mut self, order: &Order) -> Result<(), MarketError> {
        if order.timestamp < self.last_timestamp {
            return Err(MarketError::TimestampRegression {
                previous: self.last_timestamp,
                current: order.timestamp,
            });
        }
        if order.trader >= self.num_traders {
            return Err(MarketError::InvalidTrader(order.trader));
        }
        if order.stock >= self.num_stocks {
            return Err(MarketError::InvalidStock(order.stock));
        }
        if order.price == 0 || order.quantity == 0 {
            return Err(MarketError::NonPositive);
        }
        self.last_timestamp = order.timestamp;
        Ok(())
    }
}

/// Streaming order source over a line-oriented reader: parses and validates
/// each line, yielding the first error and nothing after it.
pub struct OrderFeed<R> {
    lines: std::io::Lines<R>,
    validator: Validator,
}

impl<R: BufRead> OrderFeed<R> {
    pub fn new(input: R, num_traders: u32, num_stocks: u32) -> Self {
        Self {
            lines: input.lines(),
            validator: Validator::new(num_traders, num_stocks),
        }
    }
}

impl<R: BufRead> Iterator for OrderFeed<R> {
    type Item = Result<Order, MarketError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            let order = parse_order(&line).and_then(|order| {
                self.validator.check(&order)?;
                Ok(order)
            });
            return Some(order);
        }
    }
}

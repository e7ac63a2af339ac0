//! Symbol list handling.

use std::collections::HashSet;

/// Symbols scanned when the configuration names none.
pub const DEFAULT_SYMBOLS: [&str; 14] = [
    "AAPL", "MSFT", "AMZN", "NVDA", "GOOGL", "META", "TSLA", "BRK-B", "BTC-USD", "ETH-USD",
    "SOL-USD", "DOGE-USD", "ADA-USD", "XRP-USD",
];

pub fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

/// Parses a comma separated symbol list.
///
/// Tokens are trimmed and upper-cased. Blank tokens are skipped and repeated
/// symbols keep only their first position.
pub fn parse_symbols(input: &str) -> Vec<String> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let symbol = token.trim().to_uppercase();
        if symbol.is_empty() {
            continue;
        }
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    symbols
}

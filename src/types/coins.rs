//! Static coin table served by `list_default_coins`

use serde::Serialize;

/// Display information for one coin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinInfo {
    /// Provider coin id
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
}

/// Coins offered to clients by default, in display order
pub const DEFAULT_COIN_IDS: [&str; 5] = ["bitcoin", "ethereum", "ripple", "solana", "cardano"];

/// Known ids with their display name and ticker
const KNOWN_COINS: [(&str, &str, &str); 7] = [
    ("bitcoin", "Bitcoin", "BTC"),
    ("ethereum", "Ethereum", "ETH"),
    ("ripple", "XRP", "XRP"),
    ("cardano", "Cardano", "ADA"),
    ("solana", "Solana", "SOL"),
    ("dogecoin", "Dogecoin", "DOGE"),
    ("polkadot", "Polkadot", "DOT"),
];

impl CoinInfo {
    /// Look up display information for a coin id
    ///
    /// Unknown ids fall back to the id itself for both name and ticker.
    pub fn for_id(id: &str) -> Self {
        let (name, symbol) = KNOWN_COINS
            .iter()
            .find(|(known, _, _)| *known == id)
            .map(|(_, name, symbol)| (*name, *symbol))
            .unwrap_or((id, id));

        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// The default coin list
pub fn default_coins() -> Vec<CoinInfo> {
    DEFAULT_COIN_IDS.iter().map(|id| CoinInfo::for_id(id)).collect()
}

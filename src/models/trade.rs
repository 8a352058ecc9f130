use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    /// +1 for long, -1 for short. Used when signing a price delta.
    pub fn sign(self) -> f64 {
        match self {
            TradeDirection::Long => 1.0,
            TradeDirection::Short => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TradeDirection::Long => "long",
            TradeDirection::Short => "short",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Forex,
    Futures,
    Stocks,
    Crypto,
    Options,
}

impl MarketType {
    pub fn as_str(self) -> &'static str {
        match self {
            MarketType::Forex => "forex",
            MarketType::Futures => "futures",
            MarketType::Stocks => "stocks",
            MarketType::Crypto => "crypto",
            MarketType::Options => "options",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    /// Seconds since epoch. The fractional part carries the sub-second
    /// remainder from the source data; zero means the date was unparseable.
    pub date: f64,
    pub direction: TradeDirection,
    pub entry: f64,
    pub exit: f64,
    pub size: f64,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    pub market: MarketType,
    pub commission: f64,
    pub tick_value: f64,
    pub pip_value: f64,
    pub pnl: f64,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl Trade {
    pub fn generate_id() -> String {
        let uuid = uuid::Uuid::new_v4().to_string();
        let prefix = uuid.split('-').next().unwrap_or("0");
        format!("TRADE-{}-{}", Utc::now().timestamp_millis(), prefix)
    }

    /// Copy of this trade under a new identifier. The same imported trade is
    /// appended to each selected account as an independent record.
    pub fn with_fresh_id(&self) -> Trade {
        Trade {
            id: Trade::generate_id(),
            ..self.clone()
        }
    }
}

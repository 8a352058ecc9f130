use serde::{Deserialize, Serialize};

use crate::models::{MarketType, Trade};

pub const DEFAULT_TICK_VALUE: f64 = 5.0;
pub const DEFAULT_PIP_VALUE: f64 = 10.0;
pub const DEFAULT_COMMISSION: f64 = 0.0;

/// Session defaults for money parameters that were not mapped to a column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportDefaults {
    pub tick_value: f64,
    pub pip_value: f64,
    pub commission: f64,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        ImportDefaults {
            tick_value: DEFAULT_TICK_VALUE,
            pip_value: DEFAULT_PIP_VALUE,
            commission: DEFAULT_COMMISSION,
        }
    }
}

/// Minimum price increment for forex/crypto symbols. JPY pairs quote two
/// decimal places instead of four.
pub fn pip_size(symbol: &str) -> f64 {
    if symbol.to_uppercase().contains("JPY") {
        0.01
    } else {
        0.0001
    }
}

/// Signed profit for one candidate trade. The price delta is signed by
/// direction, scaled per market class, and charged commission per unit.
pub fn compute(trade: &Trade) -> f64 {
    let delta = (trade.exit - trade.entry) * trade.direction.sign();

    let gross = match trade.market {
        MarketType::Futures | MarketType::Stocks => delta * trade.tick_value * trade.size,
        MarketType::Forex | MarketType::Crypto => {
            delta / pip_size(&trade.symbol) * trade.pip_value * trade.size
        }
        MarketType::Options => delta * trade.size,
    };

    gross - trade.commission * trade.size
}

use serde::Serialize;

use crate::models::{Trade, TradeDirection};

/// Violations for one rejected row. `row` is the 1-based display row
/// number in the source file (array index + 2: header line plus one-based
/// counting).
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<Trade>,
    pub invalid: Vec<RowError>,
}

/// Partition candidate trades into wholly-valid trades and per-row error
/// records. A row is promoted only when every applicable rule passes.
pub fn validate_all(candidates: Vec<Trade>) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (index, candidate) in candidates.into_iter().enumerate() {
        let errors = validate_trade(&candidate);
        if errors.is_empty() {
            outcome.valid.push(candidate);
        } else {
            outcome.invalid.push(RowError {
                row: index + 2,
                errors,
            });
        }
    }

    outcome
}

/// All applicable rules are checked; violations accumulate rather than
/// short-circuiting.
pub fn validate_trade(trade: &Trade) -> Vec<String> {
    let mut errors = Vec::new();

    if trade.symbol.is_empty() {
        errors.push("Symbol is missing".to_string());
    }

    if trade.date == 0.0 {
        errors.push("Invalid date format".to_string());
    }

    if trade.entry <= 0.0 {
        errors.push("Entry price must be greater than zero".to_string());
    }
    if trade.exit <= 0.0 {
        errors.push("Exit price must be greater than zero".to_string());
    }
    if trade.size <= 0.0 {
        errors.push("Position size must be greater than zero".to_string());
    }

    if let Some(stop_loss) = trade.stop_loss {
        if stop_loss > 0.0 {
            match trade.direction {
                TradeDirection::Long if stop_loss >= trade.entry => {
                    errors.push("Stop loss must be below entry price for long trades".to_string());
                }
                TradeDirection::Short if stop_loss <= trade.entry => {
                    errors.push("Stop loss must be above entry price for short trades".to_string());
                }
                _ => {}
            }
        }
    }

    if let Some(take_profit) = trade.take_profit {
        if take_profit > 0.0 {
            match trade.direction {
                TradeDirection::Long if take_profit <= trade.entry => {
                    errors
                        .push("Take profit must be above entry price for long trades".to_string());
                }
                TradeDirection::Short if take_profit >= trade.entry => {
                    errors
                        .push("Take profit must be below entry price for short trades".to_string());
                }
                _ => {}
            }
        }
    }

    errors
}

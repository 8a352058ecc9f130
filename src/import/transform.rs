use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use regex::Regex;

use crate::import::mapping::{ColumnMapping, TargetField};
use crate::import::pnl::{self, ImportDefaults};
use crate::import::tokenizer::CsvDocument;
use crate::models::{MarketType, Trade, TradeDirection};

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.,\-]").expect("valid numeric filter pattern"));

/// Date formats tried in priority order; the first that yields a valid
/// calendar date wins.
const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const TIME_FORMATS: [&str; 5] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

pub fn transform_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Parse a date into seconds since epoch. Unparseable input yields zero,
/// which the validator rejects downstream; bad dates are never dropped
/// silently.
pub fn transform_date(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64;
        }
    }

    generic_date_parse(raw).unwrap_or(0.0)
}

fn generic_date_parse(raw: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp() as f64);
        }
    }
    None
}

/// Parse a time-of-day column. Ignored (None) when unparseable.
pub fn transform_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
}

/// Case-insensitive direction synonyms. Unmatched input defaults to long;
/// the occurrence is logged so miscategorized data stays observable.
pub fn transform_direction(raw: &str) -> TradeDirection {
    match raw.trim().to_lowercase().as_str() {
        "buy" | "long" | "b" | "l" | "1" | "true" | "bullish" | "up" => TradeDirection::Long,
        "sell" | "short" | "s" | "-1" | "false" | "bearish" | "down" => TradeDirection::Short,
        other => {
            if !other.is_empty() {
                log::warn!("Unrecognized trade direction {:?}, defaulting to long", other);
            }
            TradeDirection::Long
        }
    }
}

/// Normalize a numeric string: strip everything but digits, comma, dot and
/// minus; treat comma as a decimal separator; when several dot-separated
/// groups remain, the last is the decimal part and the rest concatenate
/// into the integer part. Unparseable or empty input yields zero.
pub fn transform_numeric(raw: &str) -> f64 {
    let cleaned = NON_NUMERIC.replace_all(raw, "");
    let normalized = cleaned.replace(',', ".");

    let parts: Vec<&str> = normalized.split('.').collect();
    let candidate = if parts.len() > 2 {
        let (decimal, integer) = parts.split_last().unwrap_or((&"", &[]));
        format!("{}.{}", integer.concat(), decimal)
    } else {
        normalized
    };

    candidate.parse::<f64>().unwrap_or(0.0)
}

pub fn transform_market(raw: &str) -> MarketType {
    match raw.trim().to_lowercase().as_str() {
        "fx" | "forex" | "currency" | "currencies" => MarketType::Forex,
        "fut" | "future" | "futures" => MarketType::Futures,
        "stock" | "stocks" | "equity" | "equities" | "shares" => MarketType::Stocks,
        "crypto" | "cryptocurrency" | "coin" => MarketType::Crypto,
        "opt" | "option" | "options" => MarketType::Options,
        _ => MarketType::Futures,
    }
}

/// Apply the column mapping and per-field transforms to every raw row.
/// Pure with respect to field values: the same (rows, mapping, defaults)
/// triple always yields the same candidate fields, and nothing is written
/// anywhere until the explicit commit step.
pub fn build_candidates(
    document: &CsvDocument,
    mapping: &ColumnMapping,
    defaults: &ImportDefaults,
) -> Vec<Trade> {
    document
        .rows
        .iter()
        .map(|row| {
            let symbol = mapping
                .value(TargetField::Symbol, row)
                .map(transform_symbol)
                .unwrap_or_default();

            let mut date = mapping
                .value(TargetField::Date, row)
                .map(transform_date)
                .unwrap_or(0.0);
            if date != 0.0 {
                if let Some(time) = mapping
                    .value(TargetField::Time, row)
                    .and_then(transform_time)
                {
                    date += time.num_seconds_from_midnight() as f64
                        + time.nanosecond() as f64 / 1e9;
                }
            }

            let direction = mapping
                .value(TargetField::Type, row)
                .map(transform_direction)
                .unwrap_or(TradeDirection::Long);

            let numeric = |field: TargetField| {
                mapping.value(field, row).map(transform_numeric).unwrap_or(0.0)
            };

            let market = mapping
                .value(TargetField::MarketType, row)
                .map(transform_market)
                .unwrap_or(MarketType::Futures);

            // Unmapped money parameters fall back to the session defaults.
            let defaulted = |field: TargetField, default: f64| {
                mapping
                    .value(field, row)
                    .map(transform_numeric)
                    .unwrap_or(default)
            };

            let notes = mapping
                .value(TargetField::Notes, row)
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string);

            let mut trade = Trade {
                id: Trade::generate_id(),
                symbol,
                date,
                direction,
                entry: numeric(TargetField::Entry),
                exit: numeric(TargetField::Exit),
                size: numeric(TargetField::Size),
                take_profit: mapping.value(TargetField::Tp, row).map(transform_numeric),
                stop_loss: mapping.value(TargetField::Sl, row).map(transform_numeric),
                market,
                commission: defaulted(TargetField::Commission, defaults.commission),
                tick_value: defaulted(TargetField::TickValue, defaults.tick_value),
                pip_value: defaulted(TargetField::PipValue, defaults.pip_value),
                pnl: 0.0,
                notes,
                created_at: Utc::now().timestamp(),
            };
            trade.pnl = pnl::compute(&trade);
            trade
        })
        .collect()
}

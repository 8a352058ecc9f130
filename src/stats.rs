use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Trade;

/// Aggregate performance figures for one account's trade list. All
/// reducers are single-pass transforms over the in-memory array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub max_drawdown: f64,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    pub date: String,
    pub cumulative_pnl: f64,
    pub daily_pnl: f64,
    pub trade_count: usize,
}

pub fn dashboard_stats(trades: &[Trade]) -> DashboardStats {
    let total_trades = trades.len();
    let wins = trades.iter().filter(|t| t.pnl > 0.0).count();
    let losses = trades.iter().filter(|t| t.pnl < 0.0).count();
    let breakevens = total_trades - wins - losses;

    let closed = wins + losses;
    let win_rate = if closed > 0 {
        (wins as f64 / closed as f64) * 100.0
    } else {
        0.0
    };

    let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl.abs())
        .sum();

    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let best_trade = trades.iter().map(|t| t.pnl).fold(0.0, f64::max);
    let worst_trade = trades.iter().map(|t| t.pnl).fold(0.0, f64::min);

    let (longest_win_streak, longest_loss_streak) = streaks(trades);

    DashboardStats {
        total_trades,
        wins,
        losses,
        breakevens,
        win_rate,
        total_pnl,
        gross_profit,
        gross_loss,
        profit_factor,
        best_trade,
        worst_trade,
        max_drawdown: max_drawdown(trades),
        longest_win_streak,
        longest_loss_streak,
    }
}

/// Largest peak-to-trough drop of the cumulative P&L, walking trades in
/// date order.
pub fn max_drawdown(trades: &[Trade]) -> f64 {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by(|a, b| a.date.total_cmp(&b.date));

    let mut equity = 0.0;
    let mut peak = 0.0;
    let mut drawdown = 0.0;
    for trade in ordered {
        equity += trade.pnl;
        if equity > peak {
            peak = equity;
        }
        let dip = peak - equity;
        if dip > drawdown {
            drawdown = dip;
        }
    }
    drawdown
}

/// Longest consecutive win and loss runs in date order. Breakeven trades
/// end both runs.
pub fn streaks(trades: &[Trade]) -> (usize, usize) {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by(|a, b| a.date.total_cmp(&b.date));

    let mut best_wins = 0;
    let mut best_losses = 0;
    let mut current_wins = 0;
    let mut current_losses = 0;
    for trade in ordered {
        if trade.pnl > 0.0 {
            current_wins += 1;
            current_losses = 0;
        } else if trade.pnl < 0.0 {
            current_losses += 1;
            current_wins = 0;
        } else {
            current_wins = 0;
            current_losses = 0;
        }
        best_wins = best_wins.max(current_wins);
        best_losses = best_losses.max(current_losses);
    }
    (best_wins, best_losses)
}

/// Daily cumulative P&L points, grouped by UTC date.
pub fn equity_curve(trades: &[Trade]) -> Vec<EquityCurvePoint> {
    let mut daily_map: HashMap<String, (f64, usize)> = HashMap::new();

    for trade in trades {
        let Some(dt) = chrono::DateTime::from_timestamp(trade.date as i64, 0) else {
            continue;
        };
        let date = dt.format("%Y-%m-%d").to_string();
        let entry = daily_map.entry(date).or_insert((0.0, 0));
        entry.0 += trade.pnl;
        entry.1 += 1;
    }

    let mut sorted_dates: Vec<_> = daily_map.into_iter().collect();
    sorted_dates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut cumulative_pnl = 0.0;
    let mut result = Vec::new();
    for (date, (daily_pnl, trade_count)) in sorted_dates {
        cumulative_pnl += daily_pnl;
        result.push(EquityCurvePoint {
            date,
            cumulative_pnl,
            daily_pnl,
            trade_count,
        });
    }

    result
}

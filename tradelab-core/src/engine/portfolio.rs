//! Cash, open position, and closed-trade bookkeeping.
//!
//! At most one position is open at a time. Entries and signal exits fill
//! at the bar close (plus slippage); protective exits fill at their
//! threshold price unless the bar opened beyond it, in which case the
//! fill is the open (gap fill).

use chrono::NaiveDate;

use crate::domain::{Bar, ExitReason, Position, TradeDirection, TradeRecord};

use super::execution::{ExecutionParams, SameBarTieBreak};

#[derive(Debug)]
pub struct Portfolio {
    cash: f64,
    position: Option<Position>,
    trades: Vec<TradeRecord>,
}

impl Portfolio {
    pub fn new(starting_capital: f64) -> Self {
        Self {
            cash: starting_capital,
            position: None,
            trades: Vec::new(),
        }
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }

    /// Account equity with any open position marked at `mark_price`.
    pub fn equity(&self, mark_price: f64) -> f64 {
        match &self.position {
            None => self.cash,
            Some(pos) => match pos.side {
                TradeDirection::Long => self.cash + pos.size * mark_price,
                TradeDirection::Short => self.cash - pos.size * mark_price,
            },
        }
    }

    /// Open a position at the bar close. Returns false when sizing rounds
    /// to zero and the entry is skipped.
    pub fn try_enter(
        &mut self,
        bar_index: usize,
        date: NaiveDate,
        close: f64,
        side: TradeDirection,
        exec: &ExecutionParams,
    ) -> bool {
        debug_assert!(self.position.is_none(), "entry with a position open");
        let fill = exec.entry_fill(close, side);
        let size = exec.sizing.size_for(self.cash, fill);
        if size <= 0.0 {
            return false;
        }

        match side {
            TradeDirection::Long => {
                self.cash -= fill * size + exec.commission_per_trade;
            }
            TradeDirection::Short => {
                self.cash += fill * size - exec.commission_per_trade;
            }
        }
        self.position = Some(Position {
            side,
            entry_bar: bar_index,
            entry_date: date,
            entry_price: fill,
            size,
        });
        true
    }

    /// Close the open position against `reference_price`.
    ///
    /// Slippage is skipped for the forced close on the final bar, which
    /// is a mark-out rather than a market order.
    pub fn exit(
        &mut self,
        bar_index: usize,
        date: NaiveDate,
        reference_price: f64,
        reason: ExitReason,
        exec: &ExecutionParams,
        with_slippage: bool,
    ) {
        let pos = match self.position.take() {
            Some(pos) => pos,
            None => return,
        };
        let fill = if with_slippage {
            exec.exit_fill(reference_price, pos.side)
        } else {
            reference_price
        };

        match pos.side {
            TradeDirection::Long => {
                self.cash += fill * pos.size - exec.commission_per_trade;
            }
            TradeDirection::Short => {
                self.cash -= fill * pos.size + exec.commission_per_trade;
            }
        }

        let pnl = (fill - pos.entry_price) * pos.size * pos.side.sign()
            - 2.0 * exec.commission_per_trade;
        let notional = pos.entry_price * pos.size;
        let pnl_pct = if notional > 0.0 {
            pnl / notional * 100.0
        } else {
            0.0
        };

        self.trades.push(TradeRecord {
            side: pos.side,
            entry_bar: pos.entry_bar,
            entry_date: pos.entry_date,
            entry_price: pos.entry_price,
            exit_bar: bar_index,
            exit_date: date,
            exit_price: fill,
            size: pos.size,
            pnl,
            pnl_pct,
            exit_reason: reason,
        });
    }

    /// Check the bar's range against the position's stop-loss and
    /// take-profit thresholds, closing the position if either was touched.
    ///
    /// Entries fill at the close of their bar, so the entry bar's own
    /// range is never checked. Returns true when an exit fired.
    pub fn check_protective_exits(
        &mut self,
        bar_index: usize,
        bar: &Bar,
        exec: &ExecutionParams,
    ) -> bool {
        let pos = match &self.position {
            Some(pos) if bar_index > pos.entry_bar => pos,
            _ => return false,
        };
        let side = pos.side;
        let stop = exec.stop_price(pos.entry_price, side);
        let target = exec.take_profit_price(pos.entry_price, side);

        let (stop_hit, stop_ref, target_hit, target_ref) = match side {
            TradeDirection::Long => (
                bar.low <= stop,
                if bar.open <= stop { bar.open } else { stop },
                bar.high >= target,
                if bar.open >= target { bar.open } else { target },
            ),
            TradeDirection::Short => (
                bar.high >= stop,
                if bar.open >= stop { bar.open } else { stop },
                bar.low <= target,
                if bar.open <= target { bar.open } else { target },
            ),
        };

        let resolved = match (stop_hit, target_hit) {
            (false, false) => return false,
            (true, false) => (stop_ref, ExitReason::StopLoss),
            (false, true) => (target_ref, ExitReason::TakeProfit),
            (true, true) => match exec.tie_break {
                SameBarTieBreak::StopLossFirst => (stop_ref, ExitReason::StopLoss),
                SameBarTieBreak::TakeProfitFirst => (target_ref, ExitReason::TakeProfit),
            },
        };

        self.exit(bar_index, bar.date, resolved.0, resolved.1, exec, true);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DirectionMode, PositionSizing};

    fn exec() -> ExecutionParams {
        ExecutionParams {
            stop_loss_pct: 2.0,
            take_profit_pct: 4.0,
            direction: DirectionMode::Both,
            sizing: PositionSizing::Fixed { lots: 10.0 },
            slippage_pct: 0.0,
            commission_per_trade: 1.0,
            starting_capital: 10_000.0,
            tie_break: SameBarTieBreak::StopLossFirst,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn bar(day: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: date(day),
            open,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn long_round_trip_accounting() {
        let exec = exec();
        let mut portfolio = Portfolio::new(10_000.0);
        assert!(portfolio.try_enter(0, date(2), 100.0, TradeDirection::Long, &exec));
        // cash = 10_000 - 1_000 - 1 = 8_999, marked flat at entry
        assert!((portfolio.equity(100.0) - 9_999.0).abs() < 1e-9);

        portfolio.exit(3, date(5), 110.0, ExitReason::Signal, &exec, true);
        let trades = portfolio.trades();
        assert_eq!(trades.len(), 1);
        // (110 - 100) * 10 - 2 commissions
        assert!((trades[0].pnl - 98.0).abs() < 1e-9);
        assert!((portfolio.equity(0.0) - 10_098.0).abs() < 1e-9);
    }

    #[test]
    fn short_round_trip_accounting() {
        let exec = exec();
        let mut portfolio = Portfolio::new(10_000.0);
        assert!(portfolio.try_enter(0, date(2), 100.0, TradeDirection::Short, &exec));
        portfolio.exit(2, date(4), 90.0, ExitReason::Signal, &exec, true);
        let trade = &portfolio.trades()[0];
        // (100 - 90) * 10 - 2
        assert!((trade.pnl - 98.0).abs() < 1e-9);
        assert!((portfolio.equity(0.0) - 10_098.0).abs() < 1e-9);
    }

    #[test]
    fn trade_pnl_matches_cash_delta() {
        let mut exec = exec();
        exec.slippage_pct = 0.5;
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.try_enter(0, date(2), 100.0, TradeDirection::Long, &exec);
        portfolio.exit(4, date(8), 107.0, ExitReason::Signal, &exec, true);
        let trade = &portfolio.trades()[0];
        assert!((portfolio.equity(0.0) - (10_000.0 + trade.pnl)).abs() < 1e-9);
    }

    #[test]
    fn zero_size_entry_is_skipped() {
        let mut exec = exec();
        exec.sizing = PositionSizing::PercentOfEquity { fraction: 0.001 };
        let mut portfolio = Portfolio::new(1_000.0);
        assert!(!portfolio.try_enter(0, date(2), 100.0, TradeDirection::Long, &exec));
        assert!(portfolio.position().is_none());
        assert!((portfolio.equity(0.0) - 1_000.0).abs() < 1e-12);
    }

    #[test]
    fn stop_loss_fires_at_threshold() {
        let exec = exec();
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.try_enter(0, date(2), 100.0, TradeDirection::Long, &exec);
        // Stop at 98; bar dips to 97 after opening above the stop.
        let exited = portfolio.check_protective_exits(1, &bar(3, 99.0, 100.0, 97.0, 99.5), &exec);
        assert!(exited);
        let trade = &portfolio.trades()[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert!((trade.exit_price - 98.0).abs() < 1e-9);
    }

    #[test]
    fn gap_through_stop_fills_at_open() {
        let exec = exec();
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.try_enter(0, date(2), 100.0, TradeDirection::Long, &exec);
        // Opens at 95, well below the 98 stop.
        portfolio.check_protective_exits(1, &bar(3, 95.0, 96.0, 94.0, 95.5), &exec);
        let trade = &portfolio.trades()[0];
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert!((trade.exit_price - 95.0).abs() < 1e-9);
    }

    #[test]
    fn take_profit_fires_for_short() {
        let exec = exec();
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.try_enter(0, date(2), 100.0, TradeDirection::Short, &exec);
        // Short target at 96; bar trades down to 95.
        portfolio.check_protective_exits(1, &bar(3, 98.0, 99.0, 95.0, 97.0), &exec);
        let trade = &portfolio.trades()[0];
        assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
        assert!((trade.exit_price - 96.0).abs() < 1e-9);
    }

    #[test]
    fn entry_bar_range_is_not_checked() {
        let exec = exec();
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.try_enter(1, date(3), 100.0, TradeDirection::Long, &exec);
        let exited = portfolio.check_protective_exits(1, &bar(3, 100.0, 120.0, 80.0, 100.0), &exec);
        assert!(!exited);
        assert!(portfolio.position().is_some());
    }

    #[test]
    fn same_bar_collision_respects_tie_break() {
        let wide = bar(3, 100.0, 105.0, 97.0, 101.0); // touches both 98 and 104
        for (tie, reason) in [
            (SameBarTieBreak::StopLossFirst, ExitReason::StopLoss),
            (SameBarTieBreak::TakeProfitFirst, ExitReason::TakeProfit),
        ] {
            let mut exec = exec();
            exec.tie_break = tie;
            let mut portfolio = Portfolio::new(10_000.0);
            portfolio.try_enter(0, date(2), 100.0, TradeDirection::Long, &exec);
            portfolio.check_protective_exits(1, &wide, &exec);
            assert_eq!(portfolio.trades()[0].exit_reason, reason);
        }
    }
}

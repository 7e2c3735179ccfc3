//! External run request — validation and translation into engine types.
//!
//! Requests arrive as flat JSON (CLI input files or upstream services)
//! with percent-valued knobs. Validation happens here, once, so the
//! engine can assume well-formed parameters. The validated request is
//! echoed back in the response.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradelab_core::domain::{DirectionMode, PositionSizing};
use tradelab_core::engine::{ExecutionParams, SameBarTieBreak};
use tradelab_core::strategy::StrategyParams;

/// Catalog of runnable strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyName {
    VwapMaVolume,
    SmaCrossover,
    Rsi,
    Macd,
    BollingerBands,
}

impl StrategyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyName::VwapMaVolume => "vwap_ma_volume",
            StrategyName::SmaCrossover => "sma_crossover",
            StrategyName::Rsi => "rsi",
            StrategyName::Macd => "macd",
            StrategyName::BollingerBands => "bollinger_bands",
        }
    }

    pub fn all() -> [StrategyName; 5] {
        [
            StrategyName::VwapMaVolume,
            StrategyName::SmaCrossover,
            StrategyName::Rsi,
            StrategyName::Macd,
            StrategyName::BollingerBands,
        ]
    }
}

/// How entry size is derived: a fixed lot count or a percent of cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    #[default]
    Fixed,
    Percent,
}

fn default_starting_capital() -> f64 {
    10_000.0
}

fn default_timeframe() -> String {
    "1d".to_string()
}

fn default_risk_per_trade() -> f64 {
    1.0
}

fn default_lot_size() -> f64 {
    1.0
}

fn default_percent_capital() -> f64 {
    10.0
}

/// A complete backtest request.
///
/// Percent fields are percent-valued: `stop_loss_pct: 2.0` means a 2%
/// stop. `start_date`/`end_date` clip the bar series before the run;
/// either may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    #[serde(default)]
    pub ticker: String,
    pub strategy_name: StrategyName,
    #[serde(default = "BacktestRequest::default_direction")]
    pub strategy_direction: DirectionMode,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade_pct: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    #[serde(default)]
    pub position_type: PositionType,
    #[serde(default = "default_lot_size")]
    pub lot_size: f64,
    #[serde(default = "default_percent_capital")]
    pub percent_capital: f64,
    #[serde(default = "default_starting_capital")]
    pub starting_capital: f64,
    #[serde(default)]
    pub slippage_pct: f64,
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub tie_break: SameBarTieBreak,
    #[serde(default)]
    pub include_monte_carlo: bool,
    #[serde(default)]
    pub include_walk_forward: bool,
    #[serde(default)]
    pub include_heatmap: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("starting_capital must be at least {min}, got {value}")]
    CapitalTooSmall { min: f64, value: f64 },
    #[error("lot_size must be at least 1, got {value}")]
    LotSizeTooSmall { value: f64 },
    #[error("start_date {start} is after end_date {end}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
}

impl BacktestRequest {
    fn default_direction() -> DirectionMode {
        DirectionMode::Both
    }

    pub fn new(strategy_name: StrategyName, stop_loss_pct: f64, take_profit_pct: f64) -> Self {
        Self {
            ticker: String::new(),
            strategy_name,
            strategy_direction: DirectionMode::Both,
            timeframe: default_timeframe(),
            start_date: None,
            end_date: None,
            risk_per_trade_pct: default_risk_per_trade(),
            stop_loss_pct,
            take_profit_pct,
            position_type: PositionType::Fixed,
            lot_size: default_lot_size(),
            percent_capital: default_percent_capital(),
            starting_capital: default_starting_capital(),
            slippage_pct: 0.0,
            commission: 0.0,
            tie_break: SameBarTieBreak::default(),
            include_monte_carlo: false,
            include_walk_forward: false,
            include_heatmap: false,
        }
    }

    /// Bounds-check every knob.
    pub fn validate(&self) -> Result<(), RequestError> {
        check_range("stop_loss_pct", self.stop_loss_pct, 0.1, 20.0)?;
        check_range("take_profit_pct", self.take_profit_pct, 0.1, 50.0)?;
        check_range("risk_per_trade_pct", self.risk_per_trade_pct, 0.1, 10.0)?;
        check_range("slippage_pct", self.slippage_pct, 0.0, 5.0)?;
        check_range("commission", self.commission, 0.0, 50.0)?;
        if self.starting_capital < 100.0 {
            return Err(RequestError::CapitalTooSmall {
                min: 100.0,
                value: self.starting_capital,
            });
        }
        match self.position_type {
            PositionType::Fixed => {
                if self.lot_size < 1.0 {
                    return Err(RequestError::LotSizeTooSmall {
                        value: self.lot_size,
                    });
                }
            }
            PositionType::Percent => {
                check_range("percent_capital", self.percent_capital, 1.0, 100.0)?;
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(RequestError::DateOrder { start, end });
            }
        }
        Ok(())
    }

    /// Strategy with its catalog-default parameters.
    pub fn to_strategy_params(&self) -> StrategyParams {
        match self.strategy_name {
            StrategyName::VwapMaVolume => StrategyParams::vwap_ma_volume(),
            StrategyName::SmaCrossover => StrategyParams::sma_crossover(),
            StrategyName::Rsi => StrategyParams::rsi(),
            StrategyName::Macd => StrategyParams::macd(),
            StrategyName::BollingerBands => StrategyParams::bollinger_bands(),
        }
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        let sizing = match self.position_type {
            PositionType::Fixed => PositionSizing::Fixed {
                lots: self.lot_size,
            },
            PositionType::Percent => PositionSizing::PercentOfEquity {
                fraction: self.percent_capital / 100.0,
            },
        };
        ExecutionParams {
            stop_loss_pct: self.stop_loss_pct,
            take_profit_pct: self.take_profit_pct,
            direction: self.strategy_direction,
            sizing,
            slippage_pct: self.slippage_pct,
            commission_per_trade: self.commission,
            starting_capital: self.starting_capital,
            tie_break: self.tie_break,
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), RequestError> {
    if !(min..=max).contains(&value) || value.is_nan() {
        return Err(RequestError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

//! Domain types shared by the engine and the analyzers.

pub mod bar;
pub mod equity;
pub mod position;
pub mod trade;

pub use bar::{Bar, BarSeries, BarSeriesError};
pub use equity::{drawdown_curve, EquityPoint};
pub use position::{DirectionMode, Position, PositionSizing, TradeDirection};
pub use trade::{ExitReason, TradeRecord};

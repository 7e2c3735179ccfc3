//! CSV and JSON export of run artifacts.

use serde::Serialize;
use thiserror::Error;
use tradelab_core::domain::{EquityPoint, TradeRecord};

use crate::runner::BacktestResponse;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("csv output is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("failed to flush csv writer: {0}")]
    Flush(String),
}

/// Trade tape as CSV, one row per closed trade.
///
/// Columns mirror `TradeRecord` field names.
pub fn trades_to_csv(trades: &[TradeRecord]) -> Result<String, ExportError> {
    to_csv(trades)
}

/// Equity curve as CSV: date, equity.
pub fn equity_to_csv(points: &[EquityPoint]) -> Result<String, ExportError> {
    to_csv(points)
}

/// Full response as pretty JSON.
pub fn response_to_json(response: &BacktestResponse) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(response)?)
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

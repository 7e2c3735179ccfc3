//! TradeLab Core — engine, domain types, indicators, strategies, run pipeline.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, positions, trades, equity points)
//! - Rolling indicator engine (SMA, EMA, VWAP, RSI, MACD, Bollinger)
//! - Five closed-dispatch strategy evaluators
//! - Position & execution state machine with stop-loss / take-profit brackets
//! - Bar-by-bar run pipeline producing trades and an equity curve

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;

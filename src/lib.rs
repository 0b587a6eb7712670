//! rate-hedge: Bond ETF hedge sizing and rate spread tracking
//!
//! This library provides the core components for:
//! - Exposure of bond ETF holdings against a leveraged reference position
//! - Call-option leg selection and hedge contract sizing
//! - Safe short-call screening
//! - Strategy capital allocation, covered-call income and return projection
//! - Daily rate observation logs with upsert-by-date
//! - Historical swap spread series
//! - Market data from Yahoo Finance or an offline snapshot

pub mod analysis;
pub mod cli;
pub mod config;
pub mod hedge;
pub mod market;
pub mod options;
pub mod ratelog;
pub mod strategy;
pub mod telemetry;

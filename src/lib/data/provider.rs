/*
 * Project::Augur, automated time series forecasting with GUI
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, NaiveTime};
use tracing::debug;
use yahoo_finance_api as yahoo;

use super::typedef::QuotePeriod;
use crate::error::AugurError;

/// Daily closing prices keyed by trading date.
#[async_trait]
pub(crate) trait QuoteProvider: Send + Sync {
	fn name(&self) -> &str;
	async fn fetch_closes(
		&self,
		symbol: &str,
		period: QuotePeriod,
	) -> Result<Vec<(NaiveDateTime, f64)>, AugurError>;
}

#[derive(Default)]
pub(crate) struct YahooProvider;

impl YahooProvider {
	const INTERVAL: &'static str = "1d";
}

#[async_trait]
impl QuoteProvider for YahooProvider {
	fn name(&self) -> &str {
		"Yahoo"
	}

	async fn fetch_closes(
		&self,
		symbol: &str,
		period: QuotePeriod,
	) -> Result<Vec<(NaiveDateTime, f64)>, AugurError> {
		let provider = yahoo::YahooConnector::new()
			.map_err(|err| AugurError::QuoteFetch(format!("Failed to init Yahoo connector: {err}")))?;

		debug!(symbol, %period, "requesting quote range");
		let response = provider
			.get_quote_range(symbol, Self::INTERVAL, &period.to_string())
			.await
			.map_err(|err| AugurError::QuoteFetch(format!("Yahoo API error for {symbol}: {err}")))?;

		let quotes = response
			.quotes()
			.map_err(|err| AugurError::QuoteFetch(format!("Failed to parse Yahoo quotes: {err}")))?;

		// Only the trading date matters, the intraday stamp is the session open
		Ok(quotes
			.iter()
			.filter_map(|quote| {
				let date = DateTime::from_timestamp(quote.timestamp as i64, 0)?.date_naive();
				Some((date.and_time(NaiveTime::MIN), quote.close))
			})
			.collect())
	}
}

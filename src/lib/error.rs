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

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AugurError {
	#[error("Cannot parse \"{0}\" file extension")]
	UnsupportedFile(String),

	#[error(transparent)]
	Csv(#[from] csv::Error),

	#[error(transparent)]
	Spreadsheet(#[from] calamine::Error),

	#[error("Column \"{0}\" is missing, the header must contain ds and y")]
	MissingColumn(&'static str),

	#[error("The selected sheet has no header")]
	MissingHeader,

	#[error("{0}")]
	QuoteFetch(String),

	#[error("Every timestamp in the ds column is empty or unparseable")]
	NoTimestamps,

	#[error("Need at least 2 rows with a valid ds and y, found {0}")]
	InsufficientData(usize),

	#[error("{0}")]
	Engine(String),

	#[error("{0}")]
	Export(String),

	#[error("Load a spreadsheet or a ticker symbol first")]
	NoSeriesLoaded,
}

impl AugurError {
	/// Short dialog title shown above the message.
	pub(crate) fn title(&self) -> &'static str {
		match self {
			AugurError::UnsupportedFile(_) => "File Type Unsupported",
			AugurError::Csv(_) => "Failed to Read CSV File",
			AugurError::Spreadsheet(_) => "Failed to Read Spreadsheet",
			AugurError::MissingColumn(_) | AugurError::MissingHeader => "Cannot Read Header",
			AugurError::QuoteFetch(_) => "Quote Provider Unreachable",
			AugurError::NoTimestamps => "Data is Incomplete",
			AugurError::InsufficientData(_) => "Not Enough Rows",
			AugurError::Engine(_) => "Forecast Failed",
			AugurError::Export(_) => "Cannot Encode Forecast",
			AugurError::NoSeriesLoaded => "Nothing to Forecast",
		}
	}
}

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

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{NaiveDateTime, NaiveTime};

use super::typedef::ExportArtifact;
#[cfg(test)]
use crate::data::helper::parse_timestamp;
use crate::error::AugurError;
use crate::forecast::typedef::ForecastRow;

pub(crate) const EXPORT_HEADER: [&str; 4] = ["ds", "yhat", "yhat_lower", "yhat_upper"];
const EXPORT_FILE_NAME: &str = "<forecast_name>.csv";
const EXPORT_LABEL: &str = "Download CSV File";
const EXPORT_MIME: &str = "file/csv";

pub(crate) fn format_timestamp(timestamp: NaiveDateTime, date_only: bool) -> String {
	if date_only {
		timestamp.format("%Y-%m-%d").to_string()
	} else {
		timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
	}
}

/// Header plus one line per row, no index column. Dates drop their clock part
/// only when every row sits at midnight.
pub(crate) fn encode_csv(rows: &[ForecastRow]) -> Result<String, AugurError> {
	let date_only = rows.iter().all(|each| each.ds.time() == NaiveTime::MIN);

	let mut writer = csv::Writer::from_writer(Vec::<u8>::new());
	writer.write_record(EXPORT_HEADER)?;

	for each in rows {
		writer.write_record([
			format_timestamp(each.ds, date_only),
			each.yhat.to_string(),
			each.yhat_lower.to_string(),
			each.yhat_upper.to_string(),
		])?;
	}

	let bytes = writer
		.into_inner()
		.map_err(|err| AugurError::Export(err.to_string()))?;

	String::from_utf8(bytes).map_err(|err| AugurError::Export(err.to_string()))
}

/// Reads an exported forecast back.
#[cfg(test)]
pub(crate) fn decode_csv(text: &str) -> Result<Vec<ForecastRow>, AugurError> {
	let mut reader = csv::Reader::from_reader(text.as_bytes());

	let headers = reader.headers()?;
	if headers.iter().ne(EXPORT_HEADER) {
		return Err(AugurError::Export(format!(
			"Unexpected header \"{}\"",
			headers.iter().collect::<Vec<_>>().join(",")
		)));
	}

	reader
		.records()
		.map(|each| {
			let row = each?;
			let number = |index: usize| {
				row.get(index)
					.and_then(|cell| cell.parse::<f64>().ok())
					.ok_or_else(|| AugurError::Export(format!("Bad number in column {index}")))
			};

			Ok(ForecastRow {
				ds: row
					.get(0)
					.and_then(parse_timestamp)
					.ok_or_else(|| AugurError::Export(String::from("Bad ds value")))?,
				yhat: number(1)?,
				yhat_lower: number(2)?,
				yhat_upper: number(3)?,
			})
		})
		.collect()
}

impl ExportArtifact {
	pub(crate) fn from_rows(rows: &[ForecastRow]) -> Result<Self, AugurError> {
		let csv_text = encode_csv(rows)?;

		Ok(Self {
			file_name: String::from(EXPORT_FILE_NAME),
			label: String::from(EXPORT_LABEL),
			href: format!("data:{EXPORT_MIME};base64,{}", STANDARD.encode(csv_text)),
		})
	}
}

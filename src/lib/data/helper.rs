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

use calamine::{Data, DataType, Reader};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use parse_datetime::parse_datetime_at_date;
use std::path::Path;
use tracing::{info, warn};

use super::provider::QuoteProvider;
use super::typedef::*;
use crate::error::AugurError;
use crate::export::helper::format_timestamp;
use crate::parameter::typedef::ParameterBounds;
use crate::typedef::{SourceKind, TimeSeries, TimeSeriesPoint};

const TIMESTAMP_COLUMN: &str = "ds";
const VALUE_COLUMN: &str = "y";

const DATETIME_FORMATS: [&str; 4] = [
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%d %H:%M",
	"%Y/%m/%d %H:%M:%S",
];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(super) enum FileFormat {
	Csv,
	Workbook,
}

pub(super) fn file_format(path: &Path) -> Result<FileFormat, AugurError> {
	let extension = path
		.extension()
		.and_then(|found| found.to_str())
		.map(|found| found.to_lowercase())
		.unwrap_or_default();

	match extension.as_str() {
		"csv" => Ok(FileFormat::Csv),
		"xlsx" | "xls" | "xlsb" | "ods" => Ok(FileFormat::Workbook),
		_ => Err(AugurError::UnsupportedFile(extension)),
	}
}

/// Coerces a timestamp cell. Anything unreadable becomes `None` instead of an error.
pub(crate) fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
	let trimmed = cell.trim();
	if trimmed.is_empty() {
		return None;
	}

	if let Some(found) = DATETIME_FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
	{
		return Some(found);
	}

	if let Some(found) = DATE_FORMATS
		.iter()
		.find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
	{
		return Some(found.and_time(NaiveTime::MIN));
	}

	// Last resort for free-form text like "2021-01-01 12:00 +07:00"
	parse_free_form(trimmed)
}

/// Only absolute moments are accepted. Relative words like "today" or a lone
/// number would otherwise resolve against the clock.
fn parse_free_form(text: &str) -> Option<NaiveDateTime> {
	let digit_groups = text
		.split(|each: char| !each.is_ascii_digit())
		.filter(|group| !group.is_empty())
		.count();
	if digit_groups < 2 {
		return None;
	}

	let resolve_from = |year: i32| {
		let reference = NaiveDate::from_ymd_opt(year, 6, 15)?
			.and_time(NaiveTime::MIN)
			.and_local_timezone(Local)
			.earliest()?;
		parse_datetime_at_date(reference, text)
			.ok()
			.map(|found| found.naive_local())
	};

	// The same answer from two different reference dates means nothing was relative
	match (resolve_from(2001), resolve_from(2011)) {
		(Some(first), Some(second)) if first == second => Some(first),
		_ => None,
	}
}

pub(super) fn parse_value(cell: &str) -> Option<f64> {
	cell.trim().parse::<f64>().ok()
}

fn cell_timestamp(cell: &Data) -> Option<NaiveDateTime> {
	match cell {
		// Numbers in a General-formatted column are Excel date serials
		Data::DateTime(_) | Data::DateTimeIso(_) | Data::Float(_) | Data::Int(_) => {
			cell.as_datetime()
		}
		Data::Empty | Data::Error(_) => None,
		Data::String(text) => parse_timestamp(text),
		other => parse_timestamp(&other.to_string()),
	}
}

fn cell_value(cell: &Data) -> Option<f64> {
	match cell {
		Data::Empty | Data::Error(_) => None,
		Data::String(text) => parse_value(text),
		other => other.as_f64(),
	}
}

/// Finds `ds` and `y` regardless of letter case.
fn locate_columns<S: AsRef<str>>(headers: &[S]) -> Result<(usize, usize), AugurError> {
	let find = |name: &'static str| {
		headers
			.iter()
			.position(|each| each.as_ref().trim().eq_ignore_ascii_case(name))
			.ok_or(AugurError::MissingColumn(name))
	};

	Ok((find(TIMESTAMP_COLUMN)?, find(VALUE_COLUMN)?))
}

fn file_label(path: &Path) -> String {
	path.file_name()
		.and_then(|name| Some(name.to_str()?.to_string()))
		.unwrap_or(String::from("(unknown)"))
}

pub(super) fn read_csv(path: &Path) -> Result<Vec<TimeSeriesPoint>, AugurError> {
	let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
	let headers = reader.headers()?.iter().map(str::to_string).collect::<Vec<_>>();
	let (ds_index, y_index) = locate_columns(headers.as_slice())?;

	reader
		.records()
		.map(|each| {
			let row = each?;
			Ok(TimeSeriesPoint::new(
				row.get(ds_index).and_then(parse_timestamp),
				row.get(y_index).and_then(parse_value),
			))
		})
		.collect()
}

pub(super) fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<TimeSeriesPoint>, AugurError> {
	let mut workbook = calamine::open_workbook_auto(path)?;

	let tab_name = match sheet {
		Some(found) => found.to_string(),
		None => workbook
			.sheet_names()
			.first()
			.cloned()
			.ok_or(AugurError::MissingHeader)?,
	};

	let range = workbook.worksheet_range(&tab_name)?;
	let headers = range.headers().ok_or(AugurError::MissingHeader)?;
	let (ds_index, y_index) = locate_columns(headers.as_slice())?;

	Ok(range
		.rows()
		.skip(1) // Skip header row
		.map(|each_row| {
			TimeSeriesPoint::new(
				each_row.get(ds_index).and_then(cell_timestamp),
				each_row.get(y_index).and_then(cell_value),
			)
		})
		.collect())
}

/// Workbook tab names, or `None` for formats without tabs.
pub(super) fn list_sheets(path: &Path) -> Result<Option<Vec<String>>, AugurError> {
	match file_format(path)? {
		FileFormat::Csv => Ok(None),
		FileFormat::Workbook => Ok(Some(calamine::open_workbook_auto(path)?.sheet_names())),
	}
}

/// Reads every row verbatim, in file order.
pub(crate) fn load_file(path: &Path, sheet: Option<&str>) -> Result<TimeSeries, AugurError> {
	let points = match file_format(path)? {
		FileFormat::Csv => read_csv(path)?,
		FileFormat::Workbook => read_workbook(path, sheet)?,
	};

	let series = TimeSeries::new(file_label(path), SourceKind::File, points);

	let null_count = series.null_timestamp_count();
	if null_count > 0 {
		warn!(null_count, file = %series.label, "unparseable ds cells coerced to null");
	}
	info!(rows = series.points.len(), file = %series.label, "loaded file");

	Ok(series)
}

pub(super) fn series_from_quotes(symbol: &str, mut closes: Vec<(NaiveDateTime, f64)>) -> TimeSeries {
	closes.sort_by_key(|each| each.0);

	TimeSeries::new(
		symbol.to_uppercase(),
		SourceKind::Quote,
		closes
			.into_iter()
			.map(|(timestamp, value)| TimeSeriesPoint::new(Some(timestamp), Some(value)))
			.collect(),
	)
}

pub(crate) async fn load_quote(
	provider: &dyn QuoteProvider,
	symbol: &str,
	period: QuotePeriod,
) -> Result<TimeSeries, AugurError> {
	let closes = provider.fetch_closes(symbol, period).await?;
	if closes.is_empty() {
		warn!(symbol, %period, provider = provider.name(), "quote history is empty");
	}

	let series = series_from_quotes(symbol, closes);
	info!(rows = series.points.len(), symbol, %period, "loaded quotes");

	Ok(series)
}

/// Single entry point of the loader, whatever the source is.
pub(crate) async fn load_series(
	source: &SeriesSource,
	provider: &dyn QuoteProvider,
) -> Result<TimeSeries, AugurError> {
	match source {
		SeriesSource::File { path, sheet } => load_file(path, sheet.as_deref()),
		SeriesSource::Quote { symbol, period } => load_quote(provider, symbol, *period).await,
	}
}

pub(crate) fn preview(series: &TimeSeries) -> Vec<PreviewRow> {
	series
		.points
		.iter()
		.zip(0u32..)
		.map(|(each, id)| PreviewRow {
			id,
			ds: each
				.timestamp
				.map(|found| format_timestamp(found, found.time() == NaiveTime::MIN)),
			y: each.value,
		})
		.collect()
}

impl DataInfo {
	pub(crate) fn new(series: &TimeSeries, tabs: Option<Vec<String>>, selected_tab: Option<String>) -> Self {
		Self {
			name: series.label.clone(),
			kind: series.kind,
			tabs,
			selected_tab,
			rows: preview(series),
			null_timestamps: series.null_timestamp_count(),
			bounds: ParameterBounds::for_kind(series.kind),
		}
	}
}

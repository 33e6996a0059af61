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

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{
	borrow::Cow,
	path::PathBuf,
	sync::{Arc, Mutex},
};

#[derive(Default, Serialize, Clone)]
pub(crate) struct ErrorInfo {
	pub title: Cow<'static, str>,
	pub message: String,
}

/// Where a series came from. Decides the horizon ceiling of the form.
#[derive(Default, PartialEq, Eq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SourceKind {
	#[default]
	File,
	Quote,
}

/// One `(ds, y)` row. `None` marks a cell that could not be coerced.
#[derive(Default, PartialEq, Serialize, Clone, Copy, Debug)]
pub(crate) struct TimeSeriesPoint {
	pub timestamp: Option<NaiveDateTime>,
	pub value: Option<f64>,
}

impl TimeSeriesPoint {
	pub(crate) fn new(timestamp: Option<NaiveDateTime>, value: Option<f64>) -> Self {
		Self {
			timestamp,
			value: value.filter(|found| found.is_finite()),
		}
	}

	pub(crate) fn observed(&self) -> Option<(NaiveDateTime, f64)> {
		Some((self.timestamp?, self.value?))
	}
}

/// Immutable once loaded. Row order is whatever the source delivered.
#[derive(Default, Clone, Debug)]
pub(crate) struct TimeSeries {
	pub label: String,
	pub kind: SourceKind,
	pub points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
	pub(crate) fn new(label: impl Into<String>, kind: SourceKind, points: Vec<TimeSeriesPoint>) -> Self {
		Self {
			label: label.into(),
			kind,
			points,
		}
	}

	/// Rows usable for fitting, oldest first. Duplicated timestamps are kept.
	pub(crate) fn observed(&self) -> Vec<(NaiveDateTime, f64)> {
		let mut observed = self
			.points
			.iter()
			.filter_map(TimeSeriesPoint::observed)
			.collect::<Vec<_>>();
		observed.sort_by_key(|each| each.0);
		observed
	}

	/// Latest non-null timestamp. Null timestamps never win.
	pub(crate) fn max_timestamp(&self) -> Option<NaiveDateTime> {
		self.points.iter().filter_map(|each| each.timestamp).max()
	}

	/// Sorted, deduplicated non-null timestamps.
	pub(crate) fn distinct_timestamps(&self) -> Vec<NaiveDateTime> {
		let mut timestamps = self
			.points
			.iter()
			.filter_map(|each| each.timestamp)
			.collect::<Vec<_>>();
		timestamps.sort_unstable();
		timestamps.dedup();
		timestamps
	}

	pub(crate) fn null_timestamp_count(&self) -> usize {
		self.points.iter().filter(|each| each.timestamp.is_none()).count()
	}
}

#[derive(Default)]
pub(crate) struct AppState {
	pub source_path: Option<PathBuf>,
	pub series: Option<Arc<TimeSeries>>,
	pub page_index: u8,
}

impl AppState {
	/// Switches page. Fails when an earlier command panicked while holding the lock.
	pub(crate) fn move_to(state: &Mutex<AppState>, page_index: u8) -> Result<u8, String> {
		let mut guarded_state = state.lock().map_err(|err| err.to_string())?;
		guarded_state.page_index = page_index;
		Ok(guarded_state.page_index)
	}
}

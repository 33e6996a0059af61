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

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::{Display, EnumIter, EnumString};

use crate::parameter::typedef::ParameterBounds;
use crate::typedef::SourceKind;

/// Lookback windows understood by the quote provider.
#[derive(
	Default, PartialEq, Eq, EnumIter, EnumString, Display, Deserialize, Serialize, Clone, Copy, Debug,
)]
pub(crate) enum QuotePeriod {
	#[strum(serialize = "1mo")]
	#[serde(rename = "1mo")]
	OneMonth,
	#[strum(serialize = "3mo")]
	#[serde(rename = "3mo")]
	ThreeMonths,
	#[strum(serialize = "6mo")]
	#[serde(rename = "6mo")]
	SixMonths,
	#[default]
	#[strum(serialize = "1y")]
	#[serde(rename = "1y")]
	OneYear,
	#[strum(serialize = "2y")]
	#[serde(rename = "2y")]
	TwoYears,
	#[strum(serialize = "5y")]
	#[serde(rename = "5y")]
	FiveYears,
	#[strum(serialize = "10y")]
	#[serde(rename = "10y")]
	TenYears,
	#[strum(serialize = "ytd")]
	#[serde(rename = "ytd")]
	YearToDate,
	#[strum(serialize = "max")]
	#[serde(rename = "max")]
	Max,
}

/// Every way a series can enter the pipeline.
#[derive(Clone, Debug)]
pub(crate) enum SeriesSource {
	File {
		path: PathBuf,
		sheet: Option<String>,
	},
	Quote {
		symbol: String,
		period: QuotePeriod,
	},
}

#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PreviewRow {
	pub id: u32,
	pub ds: Option<String>,
	pub y: Option<f64>,
}

#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataInfo {
	pub name: String,
	pub kind: SourceKind,
	pub tabs: Option<Vec<String>>,
	pub selected_tab: Option<String>,
	pub rows: Vec<PreviewRow>,
	pub null_timestamps: usize,
	pub bounds: ParameterBounds,
}

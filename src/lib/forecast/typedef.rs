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
use serde::Serialize;

use crate::export::typedef::ExportArtifact;
use crate::parameter::typedef::ForecastConfig;

/// One future-window line, also the export row.
#[derive(Default, PartialEq, Serialize, Clone, Copy, Debug)]
pub(crate) struct ForecastRow {
	pub ds: NaiveDateTime,
	pub yhat: f64,
	pub yhat_lower: f64,
	pub yhat_upper: f64,
}

/// History and future together, for the overlay chart.
#[derive(Default, PartialEq, Serialize, Clone, Copy, Debug)]
pub(crate) struct Estimate {
	pub ds: NaiveDateTime,
	pub actual: Option<f64>,
	pub yhat: f64,
	pub yhat_lower: f64,
	pub yhat_upper: f64,
}

#[derive(Default, PartialEq, Serialize, Clone, Debug)]
pub(crate) struct Component {
	pub name: String,
	pub values: Vec<f64>,
}

/// Step between two consecutive timestamps of a series.
#[derive(PartialEq, Eq, Serialize, Clone, Copy, Debug)]
#[serde(tag = "unit", rename_all = "lowercase")]
pub(crate) enum Cadence {
	Fixed { seconds: i64 },
	Monthly,
	Quarterly,
	Yearly,
}

impl Default for Cadence {
	fn default() -> Self {
		Cadence::Fixed { seconds: 86400 }
	}
}

#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForecastResult {
	pub future: Vec<ForecastRow>,
	pub estimates: Vec<Estimate>,
	pub components: Vec<Component>,
	pub cadence: Cadence,
	pub skipped_rows: usize,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForecastReport {
	pub config: ForecastConfig,
	#[serde(flatten)]
	pub result: ForecastResult,
	pub export: ExportArtifact,
}

/// A periodic term handed to the engine.
#[derive(PartialEq, Serialize, Clone, Debug)]
pub(crate) struct Seasonality {
	pub name: String,
	pub period_days: f64,
	pub fourier_order: usize,
}

impl Seasonality {
	pub(crate) fn new(name: &str, period_days: f64, fourier_order: usize) -> Self {
		Self {
			name: name.to_string(),
			period_days,
			fourier_order,
		}
	}
}

/// Everything the engine needs to know about one fit.
#[derive(PartialEq, Clone, Debug)]
pub(crate) struct ModelSpec {
	pub seasonalities: Vec<Seasonality>,
	pub interval_width: f64,
}

#[derive(Default, PartialEq, Clone, Debug)]
pub(crate) struct Prediction {
	pub yhat: f64,
	pub yhat_lower: f64,
	pub yhat_upper: f64,
	/// Aligned with `FittedModel::component_names`
	pub components: Vec<f64>,
}

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

use crate::data::typedef::QuotePeriod;

/// Raw control values, exactly as the form sends them.
#[derive(Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ParameterForm {
	pub horizon: u32,
	pub confidence_percent: u8,
	pub yearly: bool,
	pub monthly: bool,
	pub weekly: bool,
	pub daily: bool,
}

#[derive(Default, PartialEq, Eq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeasonalityFlags {
	pub yearly: bool,
	pub monthly: bool,
	pub weekly: bool,
	pub daily: bool,
}

#[derive(PartialEq, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForecastConfig {
	pub horizon: u32,
	/// Fraction in (0, 1]
	pub confidence_width: f64,
	pub seasonality: SeasonalityFlags,
}

/// Limits and defaults the form controls are built from.
#[derive(Default, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParameterBounds {
	pub min_horizon: u32,
	pub max_horizon: u32,
	pub default_horizon: u32,
	pub min_confidence_percent: u8,
	pub max_confidence_percent: u8,
	pub default_confidence_percent: u8,
	pub quote_periods: Vec<QuotePeriod>,
}

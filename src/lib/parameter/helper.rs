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

use strum::IntoEnumIterator;

use super::typedef::*;
use crate::data::typedef::QuotePeriod;
use crate::typedef::SourceKind;

pub(crate) const MIN_HORIZON: u32 = 1;
pub(crate) const FILE_MAX_HORIZON: u32 = 365;
pub(crate) const QUOTE_MAX_HORIZON: u32 = 3650;

pub(crate) const MIN_CONFIDENCE_PERCENT: u8 = 10;
pub(crate) const MAX_CONFIDENCE_PERCENT: u8 = 99;
pub(crate) const DEFAULT_CONFIDENCE_PERCENT: u8 = 80;

impl SourceKind {
	pub(crate) fn max_horizon(&self) -> u32 {
		match self {
			SourceKind::File => FILE_MAX_HORIZON,
			SourceKind::Quote => QUOTE_MAX_HORIZON,
		}
	}
}

impl Default for ParameterForm {
	fn default() -> Self {
		Self {
			horizon: MIN_HORIZON,
			confidence_percent: DEFAULT_CONFIDENCE_PERCENT,
			yearly: false,
			monthly: false,
			weekly: false,
			daily: false,
		}
	}
}

impl ForecastConfig {
	/// Clamps the form into range. Nothing else is validated here, the controls
	/// already refuse out-of-range input.
	pub(crate) fn from_form(form: &ParameterForm, kind: SourceKind) -> Self {
		let confidence_percent = form
			.confidence_percent
			.clamp(MIN_CONFIDENCE_PERCENT, MAX_CONFIDENCE_PERCENT);

		Self {
			horizon: form.horizon.clamp(MIN_HORIZON, kind.max_horizon()),
			confidence_width: f64::from(confidence_percent) / 100f64,
			seasonality: SeasonalityFlags {
				yearly: form.yearly,
				monthly: form.monthly,
				weekly: form.weekly,
				daily: form.daily,
			},
		}
	}
}

impl ParameterBounds {
	pub(crate) fn for_kind(kind: SourceKind) -> Self {
		Self {
			min_horizon: MIN_HORIZON,
			max_horizon: kind.max_horizon(),
			default_horizon: MIN_HORIZON,
			min_confidence_percent: MIN_CONFIDENCE_PERCENT,
			max_confidence_percent: MAX_CONFIDENCE_PERCENT,
			default_confidence_percent: DEFAULT_CONFIDENCE_PERCENT,
			quote_periods: QuotePeriod::iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn confidence_percent_becomes_fraction() {
		let form = ParameterForm {
			confidence_percent: 80,
			..Default::default()
		};

		let config = ForecastConfig::from_form(&form, SourceKind::File);
		assert!((config.confidence_width - 0.8).abs() < 1e-12);
	}

	#[test]
	fn horizon_ceiling_depends_on_source() {
		let form = ParameterForm {
			horizon: 10_000,
			..Default::default()
		};

		assert_eq!(ForecastConfig::from_form(&form, SourceKind::File).horizon, 365);
		assert_eq!(ForecastConfig::from_form(&form, SourceKind::Quote).horizon, 3650);
	}

	#[test]
	fn out_of_range_values_are_clamped() {
		let form = ParameterForm {
			horizon: 0,
			confidence_percent: 100,
			..Default::default()
		};

		let config = ForecastConfig::from_form(&form, SourceKind::Quote);
		assert_eq!(config.horizon, 1);
		assert!((config.confidence_width - 0.99).abs() < 1e-12);

		let config = ForecastConfig::from_form(
			&ParameterForm {
				confidence_percent: 2,
				..form
			},
			SourceKind::Quote,
		);
		assert!((config.confidence_width - 0.1).abs() < 1e-12);
	}

	#[test]
	fn seasonality_is_off_by_default() {
		let form: ParameterForm = serde_json::from_str(r#"{ "horizon": 30 }"#).unwrap();
		let config = ForecastConfig::from_form(&form, SourceKind::File);

		assert_eq!(config.horizon, 30);
		assert_eq!(config.seasonality, SeasonalityFlags::default());
		assert!((config.confidence_width - 0.8).abs() < 1e-12);
	}

	#[test]
	fn form_reads_camel_case_fields() {
		let form: ParameterForm = serde_json::from_str(
			r#"{ "horizon": 7, "confidencePercent": 95, "monthly": true, "weekly": true }"#,
		)
		.unwrap();

		let config = ForecastConfig::from_form(&form, SourceKind::Quote);
		assert!(config.seasonality.monthly && config.seasonality.weekly);
		assert!(!config.seasonality.yearly && !config.seasonality.daily);
		assert!((config.confidence_width - 0.95).abs() < 1e-12);
	}

	#[test]
	fn bounds_list_every_quote_period() {
		let bounds = ParameterBounds::for_kind(SourceKind::Quote);
		assert_eq!(bounds.quote_periods.len(), 9);
		assert_eq!(bounds.max_horizon, 3650);
		assert_eq!(bounds.quote_periods[0].to_string(), "1mo");
	}
}

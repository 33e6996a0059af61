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

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::engine::ForecastEngine;
use super::typedef::*;
use crate::error::AugurError;
use crate::export::typedef::ExportArtifact;
use crate::parameter::typedef::ForecastConfig;
use crate::typedef::TimeSeries;

const SECONDS_PER_DAY: i64 = 86400;

const YEARLY_PERIOD: f64 = 365.25;
const YEARLY_ORDER: usize = 10;
const WEEKLY_PERIOD: f64 = 7f64;
const WEEKLY_ORDER: usize = 3;
const DAILY_PERIOD: f64 = 1f64;
const DAILY_ORDER: usize = 4;
const MONTHLY_PERIOD: f64 = 30.5;
const MONTHLY_ORDER: usize = 5;

/// Built-in terms first, the custom monthly term is appended after them.
pub(crate) fn model_spec(config: &ForecastConfig) -> ModelSpec {
	let flags = config.seasonality;
	let mut seasonalities = Vec::new();

	if flags.yearly {
		seasonalities.push(Seasonality::new("yearly", YEARLY_PERIOD, YEARLY_ORDER));
	}
	if flags.weekly {
		seasonalities.push(Seasonality::new("weekly", WEEKLY_PERIOD, WEEKLY_ORDER));
	}
	if flags.daily {
		seasonalities.push(Seasonality::new("daily", DAILY_PERIOD, DAILY_ORDER));
	}
	if flags.monthly {
		seasonalities.push(Seasonality::new("monthly", MONTHLY_PERIOD, MONTHLY_ORDER));
	}

	ModelSpec {
		seasonalities,
		interval_width: config.confidence_width,
	}
}

/// Guesses the native step from the median gap. Expects sorted, distinct input.
pub(crate) fn infer_cadence(timestamps: &[NaiveDateTime]) -> Cadence {
	let mut gaps = timestamps
		.windows(2)
		.map(|pair| (pair[1] - pair[0]).num_seconds())
		.filter(|gap| *gap > 0)
		.collect::<Vec<_>>();

	if gaps.is_empty() {
		return Cadence::default();
	}

	gaps.sort_unstable();
	let median = gaps[gaps.len() / 2];

	match median / SECONDS_PER_DAY {
		28..=31 => Cadence::Monthly,
		89..=92 => Cadence::Quarterly,
		365..=366 => Cadence::Yearly,
		_ => Cadence::Fixed { seconds: median },
	}
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
	NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
		.checked_add_months(Months::new(1))?
		.pred_opt()
}

fn step(origin: NaiveDateTime, cadence: Cadence, count: u32) -> Option<NaiveDateTime> {
	let months = match cadence {
		Cadence::Fixed { seconds } => {
			return origin
				.checked_add_signed(Duration::try_seconds(seconds.checked_mul(i64::from(count))?)?);
		}
		Cadence::Monthly => count,
		Cadence::Quarterly => count.checked_mul(3)?,
		Cadence::Yearly => count.checked_mul(12)?,
	};

	let stepped = origin.checked_add_months(Months::new(months))?;

	// Month-end series stay on month ends
	if last_day_of_month(origin.date())? == origin.date() {
		Some(last_day_of_month(stepped.date())?.and_time(origin.time()))
	} else {
		Some(stepped)
	}
}

/// History followed by `horizon` steps after its last timestamp. Calendar
/// steps from a month end land on month ends.
pub(crate) fn future_index(
	history: &[NaiveDateTime],
	cadence: Cadence,
	horizon: u32,
) -> Result<Vec<NaiveDateTime>, AugurError> {
	let last = history.last().copied().ok_or(AugurError::NoTimestamps)?;

	let mut index = history.to_vec();
	for count in 1..=horizon {
		index.push(step(last, cadence, count).ok_or_else(|| {
			AugurError::Engine(String::from("Forecast horizon runs past the representable dates"))
		})?);
	}

	Ok(index)
}

/// Fit, extend and predict. The future window is every row strictly after the
/// latest known timestamp.
pub(crate) fn compute(
	engine: &dyn ForecastEngine,
	series: &TimeSeries,
	config: &ForecastConfig,
) -> Result<ForecastResult, AugurError> {
	let skipped_rows = series.null_timestamp_count();
	if !series.points.is_empty() && skipped_rows == series.points.len() {
		return Err(AugurError::NoTimestamps);
	}

	let history = series.observed();
	if history.len() < 2 {
		return Err(AugurError::InsufficientData(history.len()));
	}

	if skipped_rows > 0 {
		warn!(
			series = %series.label,
			skipped_rows, "rows without a usable timestamp are left out"
		);
	}

	let max_timestamp = series.max_timestamp().ok_or(AugurError::NoTimestamps)?;
	let distinct = series.distinct_timestamps();
	let cadence = infer_cadence(&distinct);
	debug!(?cadence, distinct = distinct.len(), "inferred cadence");

	let spec = model_spec(config);
	let fitted = engine.fit(&history, &spec)?;

	let index = future_index(&distinct, cadence, config.horizon)?;
	let predictions = fitted.predict(&index)?;
	if predictions.len() != index.len() {
		return Err(AugurError::Engine(format!(
			"Engine returned {} predictions for {} timestamps",
			predictions.len(),
			index.len()
		)));
	}

	// Duplicated timestamps show the last value in file order
	let actuals = history.iter().copied().collect::<BTreeMap<_, _>>();

	let estimates = index
		.iter()
		.zip(&predictions)
		.map(|(ds, prediction)| Estimate {
			ds: *ds,
			actual: actuals.get(ds).copied(),
			yhat: prediction.yhat,
			yhat_lower: prediction.yhat_lower,
			yhat_upper: prediction.yhat_upper,
		})
		.collect::<Vec<_>>();

	let components = fitted
		.component_names()
		.into_iter()
		.enumerate()
		.map(|(position, name)| Component {
			name,
			values: predictions
				.iter()
				.map(|each| each.components.get(position).copied().unwrap_or_default())
				.collect(),
		})
		.collect::<Vec<_>>();

	let future = estimates
		.iter()
		.filter(|each| each.ds > max_timestamp)
		.map(|each| ForecastRow {
			ds: each.ds,
			yhat: each.yhat,
			yhat_lower: each.yhat_lower,
			yhat_upper: each.yhat_upper,
		})
		.collect::<Vec<_>>();

	info!(
		series = %series.label,
		observations = history.len(),
		horizon = config.horizon,
		future = future.len(),
		"forecast computed"
	);

	Ok(ForecastResult {
		future,
		estimates,
		components,
		cadence,
		skipped_rows,
	})
}

impl ForecastReport {
	pub(crate) fn new(result: ForecastResult, config: ForecastConfig) -> Result<Self, AugurError> {
		Ok(Self {
			export: ExportArtifact::from_rows(&result.future)?,
			config,
			result,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::export::helper::{decode_csv, encode_csv};
	use crate::forecast::engine::FittedModel;
	use crate::parameter::typedef::ParameterForm;
	use crate::typedef::{SourceKind, TimeSeriesPoint};
	use chrono::NaiveDate;
	use std::sync::{Arc, Mutex};

	/// Predicts the last observed value with a band proportional to the width.
	#[derive(Default)]
	struct StubEngine {
		seen: Arc<Mutex<Option<ModelSpec>>>,
	}

	struct StubModel {
		level: f64,
		width: f64,
		names: Vec<String>,
	}

	impl ForecastEngine for StubEngine {
		fn fit(
			&self,
			history: &[(NaiveDateTime, f64)],
			spec: &ModelSpec,
		) -> Result<Box<dyn FittedModel>, AugurError> {
			*self.seen.lock().unwrap() = Some(spec.clone());

			Ok(Box::new(StubModel {
				level: history.last().map(|each| each.1).unwrap_or_default(),
				width: spec.interval_width,
				names: std::iter::once(String::from("trend"))
					.chain(spec.seasonalities.iter().map(|each| each.name.clone()))
					.collect(),
			}))
		}
	}

	impl FittedModel for StubModel {
		fn component_names(&self) -> Vec<String> {
			self.names.clone()
		}

		fn predict(&self, index: &[NaiveDateTime]) -> Result<Vec<Prediction>, AugurError> {
			Ok(index
				.iter()
				.map(|_| Prediction {
					yhat: self.level,
					yhat_lower: self.level - 10.0 * self.width,
					yhat_upper: self.level + 10.0 * self.width,
					components: std::iter::once(self.level)
						.chain(std::iter::repeat(0.0))
						.take(self.names.len())
						.collect(),
				})
				.collect())
		}
	}

	fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(year, month, day)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap()
	}

	fn series(points: Vec<(Option<NaiveDateTime>, Option<f64>)>) -> TimeSeries {
		TimeSeries::new(
			"test",
			SourceKind::File,
			points
				.into_iter()
				.map(|(ds, y)| TimeSeriesPoint::new(ds, y))
				.collect(),
		)
	}

	fn config(horizon: u32, confidence_percent: u8, monthly: bool) -> ForecastConfig {
		ForecastConfig::from_form(
			&ParameterForm {
				horizon,
				confidence_percent,
				monthly,
				..Default::default()
			},
			SourceKind::File,
		)
	}

	fn three_days() -> TimeSeries {
		series(vec![
			(Some(at(2021, 1, 1)), Some(10.0)),
			(Some(at(2021, 1, 2)), Some(11.0)),
			(Some(at(2021, 1, 3)), Some(12.0)),
		])
	}

	#[test]
	fn future_window_continues_daily_input() {
		let result = compute(&StubEngine::default(), &three_days(), &config(2, 80, false)).unwrap();

		let dates = result.future.iter().map(|each| each.ds).collect::<Vec<_>>();
		assert_eq!(dates, vec![at(2021, 1, 4), at(2021, 1, 5)]);
		assert_eq!(result.estimates.len(), 5);
		assert_eq!(result.estimates[0].actual, Some(10.0));
		assert_eq!(result.estimates[4].actual, None);
		assert_eq!(result.cadence, Cadence::Fixed { seconds: 86400 });
	}

	#[test]
	fn single_step_and_largest_horizon() {
		let engine = StubEngine::default();

		let one = compute(&engine, &three_days(), &config(1, 80, false)).unwrap();
		assert_eq!(one.future.len(), 1);

		let longest = compute(&engine, &three_days(), &config(365, 80, false)).unwrap();
		assert_eq!(longest.future.len(), 365);
		assert_eq!(longest.future[364].ds, at(2022, 1, 3));
	}

	#[test]
	fn quote_series_accepts_its_largest_horizon() {
		let mut quotes = three_days();
		quotes.kind = SourceKind::Quote;

		let config = ForecastConfig::from_form(
			&ParameterForm {
				horizon: 3650,
				..Default::default()
			},
			SourceKind::Quote,
		);
		assert_eq!(config.horizon, 3650);

		let result = compute(&StubEngine::default(), &quotes, &config).unwrap();
		assert_eq!(result.future.len(), 3650);
		assert_eq!(result.future[3649].ds, at(2021, 1, 3) + Duration::days(3650));
	}

	#[test]
	fn monthly_term_is_added_to_builtins() {
		let engine = StubEngine::default();
		let mut with_weekly = config(2, 80, true);
		with_weekly.seasonality.weekly = true;

		let result = compute(&engine, &three_days(), &with_weekly).unwrap();
		let spec = engine.seen.lock().unwrap().clone().unwrap();

		assert_eq!(
			spec.seasonalities,
			vec![
				Seasonality::new("weekly", 7.0, 3),
				Seasonality::new("monthly", 30.5, 5),
			]
		);
		assert_eq!(spec.interval_width, 0.8);

		let names = result.components.iter().map(|each| each.name.as_str()).collect::<Vec<_>>();
		assert_eq!(names, vec!["trend", "weekly", "monthly"]);
		assert_eq!(result.components[0].values.len(), 5);
	}

	#[test]
	fn nothing_toggled_means_no_seasonality() {
		let spec = model_spec(&config(1, 80, false));
		assert!(spec.seasonalities.is_empty());
	}

	#[test]
	fn null_timestamps_are_skipped_not_fatal() {
		let input = series(vec![
			(Some(at(2021, 1, 1)), Some(10.0)),
			(None, Some(99.0)),
			(Some(at(2021, 1, 2)), Some(11.0)),
			(Some(at(2021, 1, 3)), Some(12.0)),
		]);

		let result = compute(&StubEngine::default(), &input, &config(2, 80, false)).unwrap();
		assert_eq!(result.skipped_rows, 1);
		assert_eq!(result.future[0].ds, at(2021, 1, 4));
		assert!(result.estimates.iter().all(|each| each.actual != Some(99.0)));
	}

	#[test]
	fn only_null_timestamps_is_an_error() {
		let input = series(vec![(None, Some(1.0)), (None, Some(2.0))]);
		let err = compute(&StubEngine::default(), &input, &config(2, 80, false)).unwrap_err();
		assert!(matches!(err, AugurError::NoTimestamps));
	}

	#[test]
	fn too_few_rows_is_an_error() {
		let input = series(vec![(Some(at(2021, 1, 1)), Some(1.0)), (Some(at(2021, 1, 2)), None)]);
		let err = compute(&StubEngine::default(), &input, &config(2, 80, false)).unwrap_err();
		assert!(matches!(err, AugurError::InsufficientData(1)));

		let err = compute(&StubEngine::default(), &series(Vec::new()), &config(2, 80, false))
			.unwrap_err();
		assert!(matches!(err, AugurError::InsufficientData(0)));
	}

	#[test]
	fn bounds_widen_with_confidence() {
		let engine = StubEngine::default();
		let narrow = compute(&engine, &three_days(), &config(1, 50, false)).unwrap();
		let wide = compute(&engine, &three_days(), &config(1, 95, false)).unwrap();

		let spread = |result: &ForecastResult| result.future[0].yhat_upper - result.future[0].yhat_lower;
		assert!(spread(&wide) > spread(&narrow));
		for each in &wide.future {
			assert!(each.yhat_lower <= each.yhat && each.yhat <= each.yhat_upper);
		}
	}

	#[test]
	fn month_end_series_keeps_calendar_steps() {
		let input = series(vec![
			(Some(at(2021, 1, 31)), Some(1.0)),
			(Some(at(2021, 2, 28)), Some(2.0)),
			(Some(at(2021, 3, 31)), Some(3.0)),
			(Some(at(2021, 4, 30)), Some(4.0)),
		]);

		let result = compute(&StubEngine::default(), &input, &config(3, 80, false)).unwrap();
		assert_eq!(result.cadence, Cadence::Monthly);

		let dates = result.future.iter().map(|each| each.ds).collect::<Vec<_>>();
		assert_eq!(dates, vec![at(2021, 5, 31), at(2021, 6, 30), at(2021, 7, 31)]);
	}

	#[test]
	fn february_end_steps_to_following_month_ends() {
		let input = series(vec![
			(Some(at(2020, 11, 30)), Some(1.0)),
			(Some(at(2020, 12, 31)), Some(2.0)),
			(Some(at(2021, 1, 31)), Some(3.0)),
			(Some(at(2021, 2, 28)), Some(4.0)),
		]);

		let result = compute(&StubEngine::default(), &input, &config(3, 80, false)).unwrap();
		let dates = result.future.iter().map(|each| each.ds).collect::<Vec<_>>();
		assert_eq!(dates, vec![at(2021, 3, 31), at(2021, 4, 30), at(2021, 5, 31)]);
	}

	#[test]
	fn calendar_steps_keep_day_and_clock_off_month_end() {
		let last = at(2021, 1, 15) + Duration::hours(9);

		let index = future_index(&[last], Cadence::Monthly, 2).unwrap();
		assert_eq!(
			index,
			vec![last, at(2021, 2, 15) + Duration::hours(9), at(2021, 3, 15) + Duration::hours(9)]
		);

		let quarter_end = at(2021, 6, 30) + Duration::hours(16);
		let index = future_index(&[quarter_end], Cadence::Quarterly, 2).unwrap();
		assert_eq!(index[1], at(2021, 9, 30) + Duration::hours(16));
		assert_eq!(index[2], at(2021, 12, 31) + Duration::hours(16));

		let leap_day = at(2020, 2, 29);
		let index = future_index(&[leap_day], Cadence::Yearly, 1).unwrap();
		assert_eq!(index[1], at(2021, 2, 28));
	}

	#[test]
	fn cadence_recognizes_common_steps() {
		assert_eq!(infer_cadence(&[at(2021, 1, 1)]), Cadence::default());
		assert_eq!(
			infer_cadence(&[at(2020, 1, 1), at(2020, 4, 1), at(2020, 7, 1), at(2020, 10, 1)]),
			Cadence::Quarterly
		);
		assert_eq!(
			infer_cadence(&[at(2019, 1, 1), at(2020, 1, 1), at(2021, 1, 1)]),
			Cadence::Yearly
		);

		let hourly = (0..5)
			.map(|hour| at(2021, 1, 1) + Duration::hours(hour))
			.collect::<Vec<_>>();
		assert_eq!(infer_cadence(&hourly), Cadence::Fixed { seconds: 3600 });
	}

	#[test]
	fn exported_future_reads_back() {
		let config = config(2, 80, false);
		let result = compute(&StubEngine::default(), &three_days(), &config).unwrap();
		let report = ForecastReport::new(result.clone(), config).unwrap();

		assert_eq!(decode_csv(&encode_csv(&result.future).unwrap()).unwrap(), result.future);
		assert!(report.export.href.starts_with("data:file/csv;base64,"));
	}
}

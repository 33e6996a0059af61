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

use burn::{
	backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
	module::AutodiffModule,
	nn::loss::{MseLoss, Reduction::Mean},
	optim::{AdamConfig, GradientsParams, Optimizer},
	tensor::{
		backend::{AutodiffBackend, Backend},
		ElementConversion, Tensor, TensorData,
	},
};
use chrono::NaiveDateTime;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::TAU;
use tracing::{debug, info};

use super::model::*;
use super::typedef::*;
use crate::error::AugurError;

const SECONDS_PER_DAY: f64 = 86400f64;
const TREND_COMPONENT: &str = "trend";

/// Opaque forecasting capability. Anything that can fit a history and predict
/// over an arbitrary index can drive the pipeline.
pub(crate) trait ForecastEngine: Send + Sync {
	fn fit(
		&self,
		history: &[(NaiveDateTime, f64)],
		spec: &ModelSpec,
	) -> Result<Box<dyn FittedModel>, AugurError>;
}

pub(crate) trait FittedModel: Send {
	/// Names of the additive parts reported by `predict`, in order.
	fn component_names(&self) -> Vec<String>;
	fn predict(&self, index: &[NaiveDateTime]) -> Result<Vec<Prediction>, AugurError>;
}

/// Number of standard deviations covering `width` of a normal distribution.
pub(crate) fn interval_multiplier(width: f64) -> Result<f64, AugurError> {
	let normal = Normal::new(0f64, 1f64).map_err(|err| AugurError::Engine(err.to_string()))?;

	// A full-width interval would be infinite
	let tail = (0.5 + width / 2f64).clamp(0.5, 1f64 - 1e-9);

	Ok(normal.inverse_cdf(tail))
}

/// Linear trend plus Fourier seasonal terms, trained with Adam on the
/// standardized target.
pub(crate) struct AdditiveEngine {
	pub epochs: u32,
	pub lr: f64,
}

impl Default for AdditiveEngine {
	fn default() -> Self {
		let defaults = TrainingConfig::new(AdditiveNetworkConfig::new(1), AdamConfig::new());
		Self {
			epochs: defaults.epochs,
			lr: defaults.lr,
		}
	}
}

#[derive(Clone, Debug)]
struct FeatureLayout {
	origin: NaiveDateTime,
	span_seconds: f64,
	seasonalities: Vec<Seasonality>,
}

impl FeatureLayout {
	fn feature_count(&self) -> usize {
		1 + self
			.seasonalities
			.iter()
			.map(|each| each.fourier_order * 2)
			.sum::<usize>()
	}

	/// `[trend, sin(1), cos(1), .. sin(n), cos(n)]` per seasonality. The trend is
	/// scaled to [-1, 1] across the history, seasons run on absolute days.
	fn row(&self, ds: NaiveDateTime) -> Vec<f64> {
		let elapsed = (ds - self.origin).num_seconds() as f64;
		let days = ds.and_utc().timestamp() as f64 / SECONDS_PER_DAY;

		let mut features = Vec::with_capacity(self.feature_count());
		features.push(2f64 * elapsed / self.span_seconds - 1f64);

		for each in &self.seasonalities {
			for order in 1..=each.fourier_order {
				let angle = TAU * order as f64 * days / each.period_days;
				features.push(angle.sin());
				features.push(angle.cos());
			}
		}

		features
	}
}

struct FittedAdditive {
	layout: FeatureLayout,
	weights: Vec<f64>,
	bias: f64,
	mean: f64,
	stdev: f64,
	residual_stdev: f64,
	multiplier: f64,
	last_observed: NaiveDateTime,
	step_seconds: f64,
	observation_count: usize,
}

impl FittedAdditive {
	/// Point estimate and its breakdown: trend first, then one entry per seasonality.
	fn decompose(&self, ds: NaiveDateTime) -> (f64, Vec<f64>) {
		let features = self.layout.row(ds);

		let trend = self.mean + self.stdev * (self.bias + self.weights[0] * features[0]);
		let mut components = vec![trend];

		let mut offset = 1usize;
		for each in &self.layout.seasonalities {
			let width = each.fourier_order * 2;
			let seasonal = (offset..offset + width)
				.map(|i| self.weights[i] * features[i])
				.sum::<f64>();
			components.push(self.stdev * seasonal);
			offset += width;
		}

		(components.iter().sum(), components)
	}
}

impl FittedModel for FittedAdditive {
	fn component_names(&self) -> Vec<String> {
		std::iter::once(String::from(TREND_COMPONENT))
			.chain(self.layout.seasonalities.iter().map(|each| each.name.clone()))
			.collect()
	}

	fn predict(&self, index: &[NaiveDateTime]) -> Result<Vec<Prediction>, AugurError> {
		Ok(index
			.iter()
			.map(|ds| {
				let (yhat, components) = self.decompose(*ds);

				// Uncertainty grows with the distance from the last observation
				let steps_ahead =
					((*ds - self.last_observed).num_seconds() as f64 / self.step_seconds).max(0f64);
				let spread = self.multiplier
					* self.residual_stdev
					* (1f64 + steps_ahead / self.observation_count as f64).sqrt();

				Prediction {
					yhat,
					yhat_lower: yhat - spread,
					yhat_upper: yhat + spread,
					components,
				}
			})
			.collect())
	}
}

fn train_network<B: AutodiffBackend>(
	features: &[Vec<f64>],
	targets: &[f64],
	config: &TrainingConfig,
	device: &B::Device,
) -> AdditiveNetwork<B> {
	let row_count = features.len();
	let feature_count = config.model.feature_count;

	let input = Tensor::<B, 2>::from_data(
		TensorData::new(
			features.iter().flatten().map(|each| *each as f32).collect::<Vec<_>>(),
			[row_count, feature_count],
		),
		device,
	);
	let target = Tensor::<B, 2>::from_data(
		TensorData::new(
			targets.iter().map(|each| *each as f32).collect::<Vec<_>>(),
			[row_count, 1],
		),
		device,
	);

	let mut model = config.model.init::<B>(device);
	let mut optim = config.optimizer.init::<B, AdditiveNetwork<B>>();

	for epoch in 1..=config.epochs {
		let output = model.forward(input.clone());
		let loss = MseLoss::new().forward(output, target.clone(), Mean);

		if epoch % 200 == 0 {
			debug!(epoch, loss = loss.clone().into_scalar().elem::<f32>(), "training");
		}

		let grads = GradientsParams::from_grads(loss.backward(), &model);
		model = optim.step(config.lr, model, grads);
	}

	model
}

impl ForecastEngine for AdditiveEngine {
	fn fit(
		&self,
		history: &[(NaiveDateTime, f64)],
		spec: &ModelSpec,
	) -> Result<Box<dyn FittedModel>, AugurError> {
		let (origin, last_observed) = match (history.first(), history.last()) {
			(Some(first), Some(last)) if history.len() >= 2 => (first.0, last.0),
			_ => return Err(AugurError::InsufficientData(history.len())),
		};

		let observation_count = history.len();
		let span_seconds = match (last_observed - origin).num_seconds() as f64 {
			found if found > 0f64 => found,
			_ => SECONDS_PER_DAY,
		};

		let mut distinct = history.iter().map(|each| each.0).collect::<Vec<_>>();
		distinct.dedup();
		let step_seconds = match distinct.len() {
			0 | 1 => SECONDS_PER_DAY,
			count => span_seconds / (count - 1) as f64,
		};

		// Standardize, to prevent training from diverging
		let mean = history.iter().map(|each| each.1).sum::<f64>() / observation_count as f64;
		let deviations = history
			.iter()
			.fold(0f64, |last_value, each| last_value + (each.1 - mean).powf(2f64));
		let stdev = match (deviations / (observation_count as f64 - 1f64)).sqrt() {
			found if found.is_finite() && found > 0f64 => found,
			_ => 1f64,
		};

		let layout = FeatureLayout {
			origin,
			span_seconds,
			seasonalities: spec.seasonalities.clone(),
		};
		let features = history.iter().map(|each| layout.row(each.0)).collect::<Vec<_>>();
		let targets = history
			.iter()
			.map(|each| (each.1 - mean) / stdev)
			.collect::<Vec<_>>();

		let config = TrainingConfig::new(
			AdditiveNetworkConfig::new(layout.feature_count()),
			AdamConfig::new(),
		)
		.with_epochs(self.epochs)
		.with_lr(self.lr);

		let device = NdArrayDevice::Cpu;
		Autodiff::<NdArray>::seed(rand::random());

		let (weights, bias) =
			train_network::<Autodiff<NdArray>>(&features, &targets, &config, &device)
				.valid()
				.coefficients();

		if weights.len() != layout.feature_count() || weights.iter().any(|each| !each.is_finite()) {
			return Err(AugurError::Engine(String::from(
				"Training diverged, the fitted weights are unusable",
			)));
		}

		let mut fitted = FittedAdditive {
			layout,
			weights,
			bias,
			mean,
			stdev,
			residual_stdev: 0f64,
			multiplier: interval_multiplier(spec.interval_width)?,
			last_observed,
			step_seconds,
			observation_count,
		};

		let squared_residuals = history
			.iter()
			.map(|(ds, y)| (y - fitted.decompose(*ds).0).powf(2f64))
			.sum::<f64>();
		fitted.residual_stdev = (squared_residuals / (observation_count - 1) as f64).sqrt();

		info!(
			observations = observation_count,
			features = fitted.layout.feature_count(),
			residual_stdev = fitted.residual_stdev,
			"fitted additive model"
		);

		Ok(Box::new(fitted))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, NaiveDate};

	fn daily(count: usize, value: impl Fn(usize) -> f64) -> Vec<(NaiveDateTime, f64)> {
		let origin = NaiveDate::from_ymd_opt(2021, 1, 1)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap();
		(0..count)
			.map(|i| (origin + Duration::days(i as i64), value(i)))
			.collect()
	}

	fn spec(seasonalities: Vec<Seasonality>, interval_width: f64) -> ModelSpec {
		ModelSpec {
			seasonalities,
			interval_width,
		}
	}

	#[test]
	fn multiplier_grows_with_width() {
		let narrow = interval_multiplier(0.5).unwrap();
		let usual = interval_multiplier(0.8).unwrap();
		let wide = interval_multiplier(0.99).unwrap();

		assert!(narrow < usual && usual < wide);
		assert!((usual - 1.2816).abs() < 1e-3);
		assert!(interval_multiplier(1.0).unwrap().is_finite());
	}

	#[test]
	fn single_point_cannot_be_fitted() {
		let err = AdditiveEngine::default()
			.fit(&daily(1, |_| 1.0), &spec(Vec::new(), 0.8))
			.err()
			.expect("fit must fail");
		assert!(matches!(err, AugurError::InsufficientData(1)));
	}

	#[test]
	fn follows_a_linear_trend() {
		let history = daily(40, |i| 3.0 * i as f64 + 5.0);
		let fitted = AdditiveEngine::default()
			.fit(&history, &spec(Vec::new(), 0.8))
			.unwrap();

		let index = history.iter().map(|each| each.0).collect::<Vec<_>>();
		let predictions = fitted.predict(&index).unwrap();

		let mean_error = history
			.iter()
			.zip(&predictions)
			.map(|(actual, predicted)| (actual.1 - predicted.yhat).abs())
			.sum::<f64>()
			/ history.len() as f64;

		// Values span 5..122
		assert!(mean_error < 12.0, "mean error {mean_error}");
	}

	#[test]
	fn bounds_enclose_estimate_and_widen_ahead() {
		let history = daily(60, |i| 10.0 + 0.5 * i as f64 + (i as f64 * 1.7).sin() * 3.0);
		let fitted = AdditiveEngine::default()
			.fit(
				&history,
				&spec(vec![Seasonality::new("weekly", 7.0, 3)], 0.8),
			)
			.unwrap();

		let last = history.last().unwrap().0;
		let future = (1..=10)
			.map(|i| last + Duration::days(i))
			.collect::<Vec<_>>();
		let predictions = fitted.predict(&future).unwrap();

		assert_eq!(predictions.len(), 10);
		for each in &predictions {
			assert!(each.yhat_lower <= each.yhat && each.yhat <= each.yhat_upper);
		}

		let first_width = predictions[0].yhat_upper - predictions[0].yhat_lower;
		let last_width = predictions[9].yhat_upper - predictions[9].yhat_lower;
		assert!(last_width > first_width);
	}

	#[test]
	fn components_add_up_to_estimate() {
		let history = daily(30, |i| 20.0 + (i % 7) as f64);
		let fitted = AdditiveEngine::default()
			.fit(
				&history,
				&spec(
					vec![
						Seasonality::new("weekly", 7.0, 3),
						Seasonality::new("monthly", 30.5, 5),
					],
					0.9,
				),
			)
			.unwrap();

		assert_eq!(fitted.component_names(), vec!["trend", "weekly", "monthly"]);

		let predictions = fitted.predict(&[history[3].0]).unwrap();
		let total = predictions[0].components.iter().sum::<f64>();
		assert_eq!(predictions[0].components.len(), 3);
		assert!((total - predictions[0].yhat).abs() < 1e-9);
	}

	#[test]
	fn constant_history_does_not_divide_by_zero() {
		let history = daily(5, |_| 42.0);
		let fitted = AdditiveEngine::default()
			.fit(&history, &spec(Vec::new(), 0.8))
			.unwrap();

		let predictions = fitted.predict(&[history[4].0 + Duration::days(1)]).unwrap();
		assert!(predictions[0].yhat.is_finite());
		assert!(predictions[0].yhat_lower <= predictions[0].yhat_upper);
	}
}

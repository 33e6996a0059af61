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
	config::Config,
	module::Module,
	nn::{Linear, LinearConfig},
	optim::AdamConfig,
	tensor::{backend::Backend, Tensor},
};

/// One linear layer over the trend and Fourier features, so every feature
/// contributes additively to the standardized target.
#[derive(Module, Debug)]
pub(crate) struct AdditiveNetwork<B: Backend> {
	linear: Linear<B>,
}

#[derive(Config, Debug)]
pub(crate) struct AdditiveNetworkConfig {
	pub feature_count: usize,
}

impl AdditiveNetworkConfig {
	pub(crate) fn init<B: Backend>(&self, device: &B::Device) -> AdditiveNetwork<B> {
		AdditiveNetwork {
			linear: LinearConfig::new(self.feature_count, 1).init(device),
		}
	}
}

impl<B: Backend> AdditiveNetwork<B> {
	pub(crate) fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
		self.linear.forward(features)
	}

	/// Per-feature weights and the intercept, copied out of the device.
	pub(crate) fn coefficients(&self) -> (Vec<f64>, f64) {
		let weights = self
			.linear
			.weight
			.val()
			.into_data()
			.iter::<f64>()
			.collect::<Vec<_>>();

		let bias = self
			.linear
			.bias
			.as_ref()
			.and_then(|found| found.val().into_data().iter::<f64>().next())
			.unwrap_or_default();

		(weights, bias)
	}
}

#[derive(Config)]
pub(crate) struct TrainingConfig {
	pub model: AdditiveNetworkConfig,
	pub optimizer: AdamConfig,

	#[config(default = 800)]
	pub epochs: u32,

	#[config(default = 5e-2)]
	pub lr: f64,
}

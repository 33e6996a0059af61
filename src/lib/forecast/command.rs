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

use std::sync::Mutex;
use tauri::{AppHandle, State};

use super::engine::AdditiveEngine;
use super::helper::compute;
use super::typedef::ForecastReport;
use crate::error::AugurError;
use crate::event::{move_page, report_error};
use crate::parameter::typedef::{ForecastConfig, ParameterForm};
use crate::typedef::AppState;

const RESULT_PAGE: u8 = 2;

/// Runs the whole pipeline on the loaded series. Nothing is rendered unless
/// every stage succeeds.
#[tauri::command]
pub(crate) async fn run_forecast(
	app: AppHandle,
	state: State<'_, Mutex<AppState>>,
	form: ParameterForm,
) -> Result<ForecastReport, ()> {
	let series = match state.lock() {
		Ok(guarded_state) => guarded_state.series.clone(),
		Err(err) => {
			report_error(&app, "State Inaccessible on Forecast", err);
			return Err(());
		}
	};

	let Some(series) = series else {
		let err = AugurError::NoSeriesLoaded;
		report_error(&app, err.title(), err);
		return Err(());
	};

	let config = ForecastConfig::from_form(&form, series.kind);

	let result = match tauri::async_runtime::spawn_blocking(move || {
		compute(&AdditiveEngine::default(), &series, &config)
	})
	.await
	{
		Ok(Ok(ok)) => ok,
		Ok(Err(err)) => {
			report_error(&app, err.title(), err);
			return Err(());
		}
		Err(err) => {
			report_error(&app, "Forecast Failed", err);
			return Err(());
		}
	};

	let report = match ForecastReport::new(result, config) {
		Ok(ok) => ok,
		Err(err) => {
			report_error(&app, err.title(), err);
			return Err(());
		}
	};

	match AppState::move_to(&state, RESULT_PAGE) {
		Ok(page_index) => move_page(&app, page_index),
		Err(err) => {
			report_error(&app, "State Inaccessible after Forecast", err);
			return Err(());
		}
	}

	Ok(report)
}

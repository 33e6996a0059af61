#![recursion_limit = "256"]

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
use tauri::{AppHandle, Manager, State};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod typedef;
use typedef::*;

mod error;
mod event;

mod data;
mod export;
mod forecast;
mod parameter;

use data::command::*;
use forecast::command::*;
use parameter::command::*;

const DEFAULT_LOG_FILTER: &str = "info";

#[tauri::command]
fn get_page_index(state: State<'_, Mutex<AppState>>) -> u8 {
	match state.lock() {
		Ok(guarded_state) => guarded_state.page_index,
		Err(err) => {
			error!(%err, "state inaccessible on get page index");
			0
		}
	}
}

/// Drops the loaded series and goes back to the first page.
#[tauri::command]
fn restart(app: AppHandle, state: State<'_, Mutex<AppState>>) {
	let mut guarded_state = match state.lock() {
		Ok(ok) => ok,
		Err(err) => {
			event::report_error(&app, "State Inaccessible on Restart", err);
			return;
		}
	};

	*guarded_state = Default::default();
	event::move_page(&app, guarded_state.page_index);
}

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

	// Only fails when a subscriber is already installed
	let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
	init_logging();
	info!(version = env!("CARGO_PKG_VERSION"), "starting");

	tauri::Builder::default()
		.plugin(tauri_plugin_opener::init())
		.plugin(tauri_plugin_dialog::init())
		.invoke_handler(tauri::generate_handler![
			get_page_index,
			load_file,
			select_sheet,
			load_quote,
			get_parameter_bounds,
			run_forecast,
			restart
		])
		.setup(|app| {
			app.manage(Mutex::new(AppState::default()));
			Ok(())
		})
		.run(tauri::generate_context!())
		.expect("error while running tauri application");
}

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

use std::{path::PathBuf, sync::Arc, sync::Mutex};
use tauri::{AppHandle, State};
use tauri_plugin_dialog::{DialogExt, FilePath};

use super::helper::*;
use super::provider::YahooProvider;
use super::typedef::*;
use crate::event::{move_page, report_error};
use crate::typedef::AppState;

/// Loads a source and makes it the current series. The lock is never held
/// across the load.
async fn adopt_source(
	app: &AppHandle,
	state: &State<'_, Mutex<AppState>>,
	source: SeriesSource,
	tabs: Option<Vec<String>>,
) -> Result<DataInfo, ()> {
	let series = match load_series(&source, &YahooProvider).await {
		Ok(ok) => Arc::new(ok),
		Err(err) => {
			report_error(app, err.title(), err);
			return Err(());
		}
	};

	let selected_tab = match &source {
		SeriesSource::File { sheet, .. } => sheet.clone(),
		SeriesSource::Quote { .. } => None,
	};
	let info = DataInfo::new(&series, tabs, selected_tab);

	let mut guarded_state = match state.lock() {
		Ok(ok) => ok,
		Err(err) => {
			report_error(app, "State Inaccessible on Load Data", err);
			return Err(());
		}
	};

	guarded_state.source_path = match source {
		SeriesSource::File { path, .. } => Some(path),
		SeriesSource::Quote { .. } => None,
	};
	guarded_state.series = Some(series);
	guarded_state.page_index = 1;
	move_page(app, guarded_state.page_index);

	Ok(info)
}

fn file_source(app: &AppHandle, path: PathBuf, sheet: Option<String>) -> Result<(SeriesSource, Option<Vec<String>>), ()> {
	let tabs = match list_sheets(&path) {
		Ok(ok) => ok,
		Err(err) => {
			report_error(app, err.title(), err);
			return Err(());
		}
	};

	// First tab unless the user picked one
	let sheet = sheet.or_else(|| tabs.as_ref().and_then(|found| found.first().cloned()));

	Ok((SeriesSource::File { path, sheet }, tabs))
}

/// Opens a file picker. `None` when the user cancels.
#[tauri::command]
pub(crate) async fn load_file(
	app: AppHandle,
	state: State<'_, Mutex<AppState>>,
) -> Result<Option<DataInfo>, ()> {
	let (tx, mut rx) = tauri::async_runtime::channel::<Option<FilePath>>(1);

	app.dialog()
		.file()
		.set_title("Choose a historical data file")
		.add_filter(
			"Supported Spreadsheet File",
			&["csv", "xlsx", "xlsb", "xls", "ods"],
		)
		.add_filter("Comma-Separated Values (CSV) File", &["csv"])
		.add_filter("Microsoft Excel File", &["xlsx"])
		.add_filter("Microsoft Excel Binary File", &["xlsb"])
		.add_filter("Legacy Microsoft Excel File", &["xls"])
		.add_filter("OpenDocument Spreadsheet (ODS) File", &["ods"])
		.pick_file(move |file_path| {
			let _ = tx.blocking_send(file_path);
		});

	let file_path = match rx.recv().await.flatten() {
		Some(found) => found,
		None => return Ok(None),
	};

	let path = match file_path.into_path() {
		Ok(ok) => ok,
		Err(err) => {
			report_error(&app, "Cannot Parse File Path", err);
			return Err(());
		}
	};

	let (source, tabs) = file_source(&app, path, None)?;
	adopt_source(&app, &state, source, tabs).await.map(Some)
}

/// Rereads the current workbook from another tab.
#[tauri::command]
pub(crate) async fn select_sheet(
	app: AppHandle,
	state: State<'_, Mutex<AppState>>,
	tab_name: String,
) -> Result<DataInfo, ()> {
	let source_path = match state.lock() {
		Ok(guarded_state) => guarded_state.source_path.clone(),
		Err(err) => {
			report_error(&app, "State Inaccessible on Select Sheet", err);
			return Err(());
		}
	};

	let Some(path) = source_path else {
		report_error(&app, "No File Loaded", "Choose a spreadsheet before picking a sheet");
		return Err(());
	};

	let (source, tabs) = file_source(&app, path, Some(tab_name))?;
	adopt_source(&app, &state, source, tabs).await
}

#[tauri::command]
pub(crate) async fn load_quote(
	app: AppHandle,
	state: State<'_, Mutex<AppState>>,
	symbol: String,
	period: QuotePeriod,
) -> Result<DataInfo, ()> {
	let symbol = symbol.trim().to_string();
	if symbol.is_empty() {
		report_error(&app, "Symbol Required", "Type a ticker symbol such as MSFT");
		return Err(());
	}

	adopt_source(&app, &state, SeriesSource::Quote { symbol, period }, None).await
}

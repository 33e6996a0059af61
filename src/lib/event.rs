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

use std::borrow::Cow;
use tauri::{AppHandle, Emitter};
use tracing::error;

use crate::typedef::ErrorInfo;

pub(crate) const DIALOG_ERROR: &str = "dialog-error";
pub(crate) const PAGE_MOVE: &str = "page-move";

/// Shows an error dialog on the front end. Emit failures only get logged,
/// there is nobody left to show them to.
pub(crate) fn report_error(app: &AppHandle, title: impl Into<Cow<'static, str>>, message: impl ToString) {
	let info = ErrorInfo {
		title: title.into(),
		message: message.to_string(),
	};

	error!(title = %info.title, message = %info.message, "interaction aborted");

	if let Err(err) = app.emit(DIALOG_ERROR, info) {
		error!(%err, "cannot emit {DIALOG_ERROR}");
	}
}

pub(crate) fn move_page(app: &AppHandle, page_index: u8) {
	if let Err(err) = app.emit(PAGE_MOVE, page_index) {
		error!(%err, page_index, "cannot emit {PAGE_MOVE}");
	}
}

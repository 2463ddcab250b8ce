// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera view selection.
//!
//! A view request is either a preset name or an explicit position. The
//! controller resolves it to a [`CameraCommand`] and hands that to whatever
//! implements [`CameraConsumer`]; room geometry is never touched.

use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::settings::{CameraSettings, PresetTable};
use crate::types::Point3D;

/// Built-in named views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPreset {
    Top,
    Front,
    Side,
    Isometric,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 4] = [
        CameraPreset::Top,
        CameraPreset::Front,
        CameraPreset::Side,
        CameraPreset::Isometric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraPreset::Top => "top",
            CameraPreset::Front => "front",
            CameraPreset::Side => "side",
            CameraPreset::Isometric => "isometric",
        }
    }

    /// Position of this preset in `table`.
    pub fn position(&self, table: &PresetTable) -> Point3D {
        match self {
            CameraPreset::Top => table.top,
            CameraPreset::Front => table.front,
            CameraPreset::Side => table.side,
            CameraPreset::Isometric => table.isometric,
        }
    }
}

impl FromStr for CameraPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CameraPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| Error::UnknownViewPreset(s.to_string()))
    }
}

impl fmt::Display for CameraPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller asked to look from.
///
/// Deserializes from either `"top"` or `{"x": 1, "y": 2, "z": 3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewRequest {
    Preset(String),
    Position(Point3D),
}

impl From<&str> for ViewRequest {
    fn from(name: &str) -> Self {
        ViewRequest::Preset(name.to_string())
    }
}

impl From<String> for ViewRequest {
    fn from(name: String) -> Self {
        ViewRequest::Preset(name)
    }
}

impl From<CameraPreset> for ViewRequest {
    fn from(preset: CameraPreset) -> Self {
        ViewRequest::Preset(preset.as_str().to_string())
    }
}

impl From<Point3D> for ViewRequest {
    fn from(position: Point3D) -> Self {
        ViewRequest::Position(position)
    }
}

impl From<Point3<f64>> for ViewRequest {
    fn from(position: Point3<f64>) -> Self {
        ViewRequest::Position(position.into())
    }
}

impl From<[f64; 3]> for ViewRequest {
    fn from(position: [f64; 3]) -> Self {
        ViewRequest::Position(position.into())
    }
}

/// Absolute camera position to apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraCommand {
    pub position: Point3D,
}

/// The host camera. Responsible for actually moving/animating the view.
pub trait CameraConsumer {
    fn set_position(&mut self, position: Point3<f64>);
}

/// Minimal perspective camera state, usable as a [`CameraConsumer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3D,
}

impl CameraState {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            fov: settings.fov,
            near: settings.near,
            far: settings.far,
            position: settings.position,
        }
    }
}

impl CameraConsumer for CameraState {
    fn set_position(&mut self, position: Point3<f64>) {
        self.position = position.into();
    }
}

/// Resolves view requests against a preset table.
#[derive(Debug, Clone, Default)]
pub struct ViewController {
    presets: PresetTable,
}

impl ViewController {
    pub fn new(presets: PresetTable) -> Self {
        Self { presets }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(settings.presets)
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Resolve a preset name or explicit position.
    ///
    /// Explicit positions pass through unchanged; unknown preset names are
    /// [`Error::UnknownViewPreset`].
    pub fn resolve_view(&self, request: impl Into<ViewRequest>) -> Result<CameraCommand> {
        let position = match request.into() {
            ViewRequest::Preset(name) => name.parse::<CameraPreset>()?.position(&self.presets),
            ViewRequest::Position(position) => position,
        };
        Ok(CameraCommand { position })
    }

    /// Push a resolved command to the camera.
    pub fn apply_view<C: CameraConsumer + ?Sized>(&self, camera: &mut C, command: &CameraCommand) {
        tracing::debug!(
            x = command.position.x,
            y = command.position.y,
            z = command.position.z,
            "camera view applied"
        );
        camera.set_position(command.position.to_nalgebra());
    }

    /// Resolve and apply in one step. The camera is untouched on error.
    pub fn show<C: CameraConsumer + ?Sized>(
        &self,
        camera: &mut C,
        request: impl Into<ViewRequest>,
    ) -> Result<CameraCommand> {
        let command = self.resolve_view(request)?;
        self.apply_view(camera, &command);
        Ok(command)
    }
}

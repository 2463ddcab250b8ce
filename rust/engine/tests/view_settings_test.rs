// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use room_lite_engine::{
    validate, CameraConsumer, CameraPreset, CameraState, Error, Point3D, RoomDimensions, Settings,
    ViewController, ViewRequest,
};

/// Records every position it is asked to move to.
#[derive(Default)]
struct RecordingCamera {
    moves: Vec<[f64; 3]>,
}

impl CameraConsumer for RecordingCamera {
    fn set_position(&mut self, position: nalgebra::Point3<f64>) {
        self.moves.push([position.x, position.y, position.z]);
    }
}

#[test]
fn test_every_preset_reaches_the_camera() {
    let controller = ViewController::default();
    let mut camera = RecordingCamera::default();

    for preset in CameraPreset::ALL {
        controller.show(&mut camera, preset).unwrap();
    }
    assert_eq!(
        camera.moves,
        vec![
            [0.0, 10.0, 0.0],
            [0.0, 0.0, 10.0],
            [10.0, 0.0, 0.0],
            [10.0, 10.0, 10.0]
        ]
    );
}

#[test]
fn test_rejected_view_never_reaches_the_camera() {
    let controller = ViewController::default();
    let mut camera = RecordingCamera::default();

    let err = controller.show(&mut camera, "birdseye").unwrap_err();
    assert!(matches!(err, Error::UnknownViewPreset(_)));
    assert!(err.to_string().contains("birdseye"));
    assert!(camera.moves.is_empty());
}

#[test]
fn test_dynamic_camera_consumer() {
    let controller = ViewController::default();
    let mut state = CameraState::from_settings(&Settings::default().camera);
    let camera: &mut dyn CameraConsumer = &mut state;

    let command = controller.resolve_view([3.0, 4.0, 5.0]).unwrap();
    controller.apply_view(camera, &command);
    assert_eq!(state.position, Point3D::new(3.0, 4.0, 5.0));
    assert_eq!(state.fov, 75.0);
}

#[test]
fn test_view_requests_from_json_settings() {
    let settings = Settings::from_json(
        r#"{
            "camera": {
                "fov": 60,
                "presets": {
                    "top": {"x": 0, "y": 30, "z": 0},
                    "front": {"x": 0, "y": 0, "z": 30},
                    "side": {"x": 30, "y": 0, "z": 0},
                    "isometric": {"x": 20, "y": 20, "z": 20}
                }
            }
        }"#,
    )
    .unwrap();
    let controller = ViewController::from_settings(&settings.camera);

    assert_eq!(settings.camera.fov, 60.0);
    assert_eq!(settings.camera.near, 0.1);
    assert_eq!(
        controller.resolve_view("top").unwrap().position,
        Point3D::new(0.0, 30.0, 0.0)
    );

    let request: ViewRequest = serde_json::from_str(r#"{"x": -1, "y": 2, "z": -3}"#).unwrap();
    assert_eq!(
        controller.resolve_view(request).unwrap().position,
        Point3D::new(-1.0, 2.0, -3.0)
    );
}

#[test]
fn test_validation_boundaries() {
    for (w, l, h) in [(5.0, 5.0, 7.0), (50.0, 50.0, 20.0), (12.0, 16.0, 9.0)] {
        let report = validate(&RoomDimensions::new(w, l, h));
        assert!(report.is_valid, "{}x{}x{} should be valid", w, l, h);
        assert!(report.errors.is_empty());
    }

    let report = validate(&RoomDimensions::new(4.0, 16.0, 9.0));
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec!["Width must be between 5 and 50 feet".to_string()]);

    let report = validate(&RoomDimensions::new(f64::NAN, 51.0, 6.5));
    assert_eq!(report.errors.len(), 3);
}

#[test]
fn test_validation_report_serializes_camel_case() {
    let report = validate(&RoomDimensions::new(12.0, 16.0, 25.0));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["isValid"], serde_json::Value::Bool(false));
    assert_eq!(json["errors"].as_array().unwrap().len(), 1);
}

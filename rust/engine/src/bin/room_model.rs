// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: build a room, cut openings, and report the result
//!
//! Writes a JSON summary to stdout and, with `--obj`, the room as a Y-up
//! Wavefront OBJ.
//!
//! Usage:
//!   room-model [options]

use room_lite_engine::{
    CameraState, OpeningConfig, OpeningKind, PartKey, RoomDimensions, RoomGroup,
    RoomTransformEngine, Settings, ViewController, ViewRequest,
};
use serde_json::json;
use std::env;
use std::fs;
use std::io::{self, BufWriter, Write};

/// A `--window` or `--door` argument.
struct OpeningArg {
    wall: String,
    kind: OpeningKind,
    config: OpeningConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,room_lite_engine=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut width: Option<f64> = None;
    let mut length: Option<f64> = None;
    let mut height: Option<f64> = None;
    let mut rotate: Option<f64> = None;
    let mut position: Option<[f64; 3]> = None;
    let mut view: Option<String> = None;
    let mut settings_path: Option<String> = None;
    let mut obj_path: Option<String> = None;
    let mut openings: Vec<OpeningArg> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--width" => width = Some(parse_number(flag, next_value(&args, &mut i))),
            "--length" => length = Some(parse_number(flag, next_value(&args, &mut i))),
            "--height" => height = Some(parse_number(flag, next_value(&args, &mut i))),
            "--rotate" => rotate = Some(parse_number(flag, next_value(&args, &mut i))),
            "--move" => {
                let values = parse_list(flag, next_value(&args, &mut i));
                match values.as_slice() {
                    [x, y, z] => position = Some([*x, *y, *z]),
                    _ => fail(&format!("{} expects x,y,z", flag)),
                }
            }
            "--window" => {
                openings.push(parse_opening(OpeningKind::Window, next_value(&args, &mut i)))
            }
            "--door" => openings.push(parse_opening(OpeningKind::Door, next_value(&args, &mut i))),
            "--view" => view = Some(next_value(&args, &mut i).to_string()),
            "--settings" => settings_path = Some(next_value(&args, &mut i).to_string()),
            "--obj" => obj_path = Some(next_value(&args, &mut i).to_string()),
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // Settings: file, else defaults overlaid with ROOM_* variables
    let settings = match &settings_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(&format!("cannot read settings '{}': {}", path, e)));
            Settings::from_json(&text).unwrap_or_else(|e| fail(&e.to_string()))
        }
        None => Settings::from_env(),
    };

    let defaults = settings.room.dimensions;
    let dimensions = RoomDimensions::new(
        width.unwrap_or(defaults.width),
        length.unwrap_or(defaults.length),
        height.unwrap_or(defaults.height),
    );

    let report = settings.bounds.validate(&dimensions);
    if !report.is_valid {
        for message in &report.errors {
            eprintln!("Error: {}", message);
        }
        std::process::exit(1);
    }

    let engine = RoomTransformEngine::new(&settings);
    let mut room = RoomGroup::build(&dimensions, &settings);

    if let Some(degrees) = rotate {
        engine.rotate(&mut room, degrees);
    }
    if let Some(p) = position {
        engine.move_to(&mut room, p);
    }

    let walls: Vec<PartKey> = room.walls().map(|(key, _)| key).collect();
    for opening in &openings {
        let wall = wall_key(&walls, &opening.wall);
        engine
            .cut_opening(&mut room, wall, &opening.config, opening.kind)
            .unwrap_or_else(|e| {
                fail(&format!("{} on {} wall: {}", opening.kind.as_str(), opening.wall, e))
            });
    }

    if let Err(e) = room.check_structure() {
        fail(&e.to_string());
    }

    let controller = ViewController::from_settings(&settings.camera);
    let mut camera = CameraState::from_settings(&settings.camera);
    if let Some(request) = &view {
        let request = parse_view(request);
        controller
            .show(&mut camera, request)
            .unwrap_or_else(|e| fail(&e.to_string()));
    }

    let mesh = room.flatten().unwrap_or_else(|e| fail(&e.to_string()));
    let (min, max) = mesh.bounds();

    let parts: Vec<_> = room
        .iter()
        .map(|(key, part)| {
            let parent = part
                .parent()
                .and_then(|p| room.part(p))
                .map(|p| p.kind.as_str());
            let sized = part.sized_extent();
            json!({
                "kind": part.kind,
                "parent": parent,
                "children": room.children(key).len(),
                "material": part.material,
                "size": [sized.x, sized.y, sized.z],
                "triangles": part.geometry.triangle_count(),
            })
        })
        .collect();

    let summary = json!({
        "dimensions": dimensions,
        "floorArea": dimensions.floor_area(),
        "validation": report,
        "position": [room.position().x, room.position().y, room.position().z],
        "rotationDegrees": room.yaw().to_degrees(),
        "camera": camera,
        "lighting": settings.lighting,
        "bounds": { "min": [min.x, min.y, min.z], "max": [max.x, max.y, max.z] },
        "triangles": mesh.triangle_count(),
        "parts": parts,
    });

    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(&e.to_string()),
    }

    if let Some(path) = obj_path {
        if let Err(e) = write_obj(&path, &room) {
            fail(&format!("cannot write '{}': {}", path, e));
        }
        tracing::info!(path = %path, triangles = mesh.triangle_count(), "OBJ written");
    }
}

fn next_value<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(value) => value.as_str(),
        None => fail(&format!("{} expects a value", args[*i - 1])),
    }
}

fn parse_number(flag: &str, value: &str) -> f64 {
    value
        .trim()
        .parse()
        .unwrap_or_else(|_| fail(&format!("invalid {} value '{}'", flag, value)))
}

fn parse_list(flag: &str, value: &str) -> Vec<f64> {
    value.split(',').map(|v| parse_number(flag, v)).collect()
}

/// `WALL:W,H` or `WALL:W,H,X,Y,Z`
fn parse_opening(kind: OpeningKind, value: &str) -> OpeningArg {
    let flag = format!("--{}", kind.as_str());
    let (wall, numbers) = value
        .split_once(':')
        .unwrap_or_else(|| fail(&format!("{} expects WALL:W,H[,X,Y,Z]", flag)));
    let config = match parse_list(&flag, numbers).as_slice() {
        [w, h] => OpeningConfig::new(*w, *h),
        [w, h, x, y, z] => OpeningConfig::new(*w, *h).at([*x, *y, *z]),
        _ => fail(&format!("{} expects WALL:W,H[,X,Y,Z]", flag)),
    };
    OpeningArg {
        wall: wall.to_string(),
        kind,
        config,
    }
}

/// A preset name, or `x,y,z`.
fn parse_view(value: &str) -> ViewRequest {
    if value.contains(',') {
        match parse_list("--view", value).as_slice() {
            [x, y, z] => ViewRequest::from([*x, *y, *z]),
            _ => fail("--view expects a preset name or x,y,z"),
        }
    } else {
        ViewRequest::from(value)
    }
}

/// Walls are built back, front, left, right.
fn wall_key(walls: &[PartKey], name: &str) -> PartKey {
    let index = match name {
        "back" => 0,
        "front" => 1,
        "left" => 2,
        "right" => 3,
        other => fail(&format!("unknown wall '{}' (expected back, front, left or right)", other)),
    };
    match walls.get(index) {
        Some(key) => *key,
        None => fail(&format!("room has no {} wall", name)),
    }
}

fn write_obj(path: &str, room: &RoomGroup) -> io::Result<()> {
    let mut file = BufWriter::new(fs::File::create(path)?);

    writeln!(file, "# Generated by room-model (room-lite)")?;
    writeln!(file, "# Coordinate system: Y-up, feet")?;
    writeln!(file)?;

    let mut vertex_offset: u32 = 1;
    for (index, (key, part)) in room.iter().enumerate() {
        let matrix = room
            .world_matrix(key)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        let mesh = part.geometry.transformed(&matrix);

        writeln!(file, "o {}_{}", part.kind.as_str(), index)?;
        for v in mesh.positions.chunks_exact(3) {
            writeln!(file, "v {:.6} {:.6} {:.6}", v[0], v[1], v[2])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(file, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }
        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (
                tri[0] + vertex_offset,
                tri[1] + vertex_offset,
                tri[2] + vertex_offset,
            );
            writeln!(file, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        vertex_offset += mesh.vertex_count() as u32;
    }

    file.flush()
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn print_usage() {
    println!(
        r#"Room Model
==========

Builds a parametric room, cuts windows and doors, and prints a JSON summary.

USAGE:
  room-model [OPTIONS]

OPTIONS:
  --width <ft>                  Room width (default: settings, 12)
  --length <ft>                 Room length (default: settings, 16)
  --height <ft>                 Wall height (default: settings, 9)
  --rotate <deg>                Room yaw in degrees
  --move <x,y,z>                Room position
  --window <WALL:W,H[,X,Y,Z]>   Cut a window; centered at mid-height when no position
  --door <WALL:W,H,X,Y,Z>       Cut a door; position is required
  --view <preset|x,y,z>         Camera view: top, front, side, isometric or a position
  --settings <file.json>        Settings file (default: ROOM_* environment variables)
  --obj <path>                  Also write the room as Wavefront OBJ
  -h, --help                    Show this help message

WALLS:
  back, front   width walls at -length/2 and +length/2
  left, right   length walls at -width/2 and +width/2

Opening positions are in the wall frame: X along the wall from its center,
Y up from the floor.

ENVIRONMENT:
  RUST_LOG                      Log filter (default: warn,room_lite_engine=info)
  ROOM_WIDTH, ROOM_LENGTH, ROOM_HEIGHT, ROOM_WALL_THICKNESS,
  CAMERA_FOV, ROOM_CHECK_OPENING_FIT"#
    );
}

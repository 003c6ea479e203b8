//! Render request decoding, defaulting and validation.
//!
//! A [`RenderRequest`] is the body exactly as the client sent it: every field
//! optional. [`RenderRequest::normalize`] fills in defaults and checks ranges
//! in a fixed order, returning the first violation. The resulting
//! [`RenderParams`] has no optional fields left and is what the renderer
//! invocation is built from.
//!
//! The body must be a JSON object. A field sent under both its wire name and
//! its alias (say `partNumber` and `partIdentifier`) is a duplicate field and
//! the body is rejected as malformed.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::edge::{EdgeSelection, EdgeTypeFlags};
use crate::error::{ParamError, ParamResult};

/// Defaults applied to fields the client leaves out.
pub mod defaults {
    pub const THICKNESS: f64 = 2.0;
    pub const FILL_COLOR: &str = "white";
    pub const STROKE_COLOR: &str = "currentColor";
    pub const CAMERA_LATITUDE: f64 = 30.0;
    pub const CAMERA_LONGITUDE: f64 = 45.0;
    pub const RESOLUTION: u32 = 1024;
    pub const PADDING: f64 = 0.03;
    pub const CREASE_ANGLE: f64 = 135.0;
}

/// Inclusive bounds for a numeric field, with the labels used in messages.
struct Bounds {
    param: &'static str,
    min: f64,
    max: f64,
    min_label: &'static str,
    max_label: &'static str,
}

impl Bounds {
    fn check(&self, value: f64) -> ParamResult<()> {
        // NaN fails the contains check as well
        if (self.min..=self.max).contains(&value) {
            Ok(())
        } else {
            Err(ParamError::out_of_range(
                self.param,
                self.min_label,
                self.max_label,
            ))
        }
    }
}

const THICKNESS: Bounds = Bounds {
    param: "thickness",
    min: 0.5,
    max: 20.0,
    min_label: "0.5",
    max_label: "20.0",
};
const CAMERA_LATITUDE: Bounds = Bounds {
    param: "cameraLatitude",
    min: -90.0,
    max: 90.0,
    min_label: "-90",
    max_label: "90",
};
const CAMERA_LONGITUDE: Bounds = Bounds {
    param: "cameraLongitude",
    min: -360.0,
    max: 360.0,
    min_label: "-360",
    max_label: "360",
};
const RESOLUTION_X: Bounds = Bounds {
    param: "resolutionX",
    min: 64.0,
    max: 4096.0,
    min_label: "64",
    max_label: "4096",
};
const RESOLUTION_Y: Bounds = Bounds {
    param: "resolutionY",
    ..RESOLUTION_X
};
const PADDING: Bounds = Bounds {
    param: "padding",
    min: 0.0,
    max: 0.5,
    min_label: "0",
    max_label: "0.5",
};
const CREASE_ANGLE: Bounds = Bounds {
    param: "creaseAngle",
    min: 0.0,
    max: 180.0,
    min_label: "0",
    max_label: "180",
};

/// Wire names under which the edge type flags may arrive.
const EDGE_TYPE_KEYS: [&str; 2] = ["edgeTypes", "edgeTypeSelection"];

/// Render request body as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(alias = "partIdentifier")]
    pub part_number: Option<String>,
    #[serde(alias = "lineThickness")]
    pub thickness: Option<f64>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub camera_latitude: Option<f64>,
    pub camera_longitude: Option<f64>,
    #[serde(alias = "resolutionWidth")]
    pub resolution_x: Option<i64>,
    #[serde(alias = "resolutionHeight")]
    pub resolution_y: Option<i64>,
    #[serde(alias = "framingPadding")]
    pub padding: Option<f64>,
    #[serde(alias = "creaseAngleThreshold")]
    pub crease_angle: Option<f64>,
    #[serde(alias = "edgeTypeSelection")]
    pub edge_types: Option<EdgeTypeFlags>,
}

impl RenderRequest {
    /// Decode a request body. Anything that is not a JSON object of the
    /// expected shape is [`ParamError::Malformed`].
    pub fn from_json(body: &[u8]) -> ParamResult<Self> {
        // Derived struct impls also accept arrays, filled by position
        let object: Map<String, Value> = serde_json::from_slice(body)?;
        for key in EDGE_TYPE_KEYS {
            match object.get(key) {
                None | Some(Value::Null) | Some(Value::Object(_)) => {}
                Some(_) => {
                    return Err(ParamError::Malformed(format!("{} must be an object", key)))
                }
            }
        }
        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Apply defaults and validate every field.
    pub fn normalize(self) -> ParamResult<RenderParams> {
        let part_number = match self.part_number {
            Some(p) if !p.is_empty() => p,
            _ => return Err(ParamError::MissingParameter("partNumber")),
        };
        check_part_number(&part_number)?;

        let thickness = self.thickness.unwrap_or(defaults::THICKNESS);
        THICKNESS.check(thickness)?;

        let fill_color = non_empty_or(self.fill_color, defaults::FILL_COLOR);
        let stroke_color = non_empty_or(self.stroke_color, defaults::STROKE_COLOR);

        let camera_latitude = self.camera_latitude.unwrap_or(defaults::CAMERA_LATITUDE);
        CAMERA_LATITUDE.check(camera_latitude)?;

        let camera_longitude = self
            .camera_longitude
            .unwrap_or(defaults::CAMERA_LONGITUDE);
        CAMERA_LONGITUDE.check(camera_longitude)?;

        let resolution_x = check_resolution(&RESOLUTION_X, self.resolution_x)?;
        let resolution_y = check_resolution(&RESOLUTION_Y, self.resolution_y)?;

        let padding = self.padding.unwrap_or(defaults::PADDING);
        PADDING.check(padding)?;

        let crease_angle = self.crease_angle.unwrap_or(defaults::CREASE_ANGLE);
        CREASE_ANGLE.check(crease_angle)?;

        let edge_types = EdgeSelection::resolve(&self.edge_types.unwrap_or_default());

        Ok(RenderParams {
            part_number,
            thickness,
            fill_color,
            stroke_color,
            camera_latitude,
            camera_longitude,
            resolution_x,
            resolution_y,
            padding,
            crease_angle,
            edge_types,
        })
    }
}

/// Decode and normalize in one step.
pub fn parse_render_request(body: &[u8]) -> ParamResult<RenderParams> {
    RenderRequest::from_json(body)?.normalize()
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

fn check_resolution(bounds: &Bounds, value: Option<i64>) -> ParamResult<u32> {
    let value = value.unwrap_or(i64::from(defaults::RESOLUTION));
    bounds.check(value as f64)?;
    // In range, so the cast cannot truncate
    Ok(value as u32)
}

/// Part identifiers are joined onto library directories, so they must stay
/// relative and must not climb out of the library.
fn check_part_number(part_number: &str) -> ParamResult<()> {
    let escapes = part_number.starts_with('/')
        || part_number.contains('\\')
        || part_number.contains('\0')
        || part_number.split('/').any(|segment| segment == "..");
    if escapes {
        return Err(ParamError::InvalidParameter {
            param: "partNumber",
            message: "partNumber must be a relative part identifier".to_string(),
        });
    }
    Ok(())
}

/// Fully defaulted, validated render parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub part_number: String,
    pub thickness: f64,
    pub fill_color: String,
    pub stroke_color: String,
    pub camera_latitude: f64,
    pub camera_longitude: f64,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub padding: f64,
    pub crease_angle: f64,
    pub edge_types: EdgeSelection,
}

impl RenderParams {
    /// Parameters for a part with every other field at its default.
    pub fn with_defaults(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            thickness: defaults::THICKNESS,
            fill_color: defaults::FILL_COLOR.to_string(),
            stroke_color: defaults::STROKE_COLOR.to_string(),
            camera_latitude: defaults::CAMERA_LATITUDE,
            camera_longitude: defaults::CAMERA_LONGITUDE,
            resolution_x: defaults::RESOLUTION,
            resolution_y: defaults::RESOLUTION,
            padding: defaults::PADDING,
            crease_angle: defaults::CREASE_ANGLE,
            edge_types: EdgeSelection::default(),
        }
    }
}

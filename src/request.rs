//! Wire request and response types, and validation into the closed
//! [`Operation`] sum type.
//!
//! The host hands the engine a flat JSON object, typically assembled from
//! workflow-node parameters. Deserialization is strict: unknown
//! JSON fields are rejected by serde, and [`ProcessRequest::validate`]
//! additionally rejects any field that belongs to a different operation
//! family than the one requested. The one documented permissive case is
//! `intensity` on a non-threshold effect, which is accepted and ignored by
//! the effect engine.
//!
//! Numeric ranges enforced here, so engines never see an out-of-range value:
//!
//! | Field | Range | Default |
//! |---|---|---|
//! | `intensity` (filter) | 0.0 to 2.0 | 1.0 |
//! | `intensity` (effect) | 0.0 to 1.0 | 0.5 |
//! | `brightness`, `contrast`, `saturation` | 0.0 to 3.0 | 1.0 |
//! | `hue_rotation` | -180 to 180 | 0 |
//! | `quality` | 1 to 100 | 85 (jpeg only) |
//! | `rotate` | 90, 180, 270 | none |

use crate::codec::OutputFormat;
use crate::error::ProcessingError;
use crate::ops::{
    AdjustSpec, CropRegion, FlipSpec, Operation, ResizeSpec, Rotation, TransformSpec,
};
use serde::{Deserialize, Serialize};

/// Operation family discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Filter,
    Transform,
    Adjust,
    Effect,
}

/// A single processing request as received from the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessRequest {
    pub operation: OperationKind,

    // filter family
    #[serde(default)]
    pub filter: Option<String>,
    // effect family
    #[serde(default)]
    pub effect: Option<String>,
    // shared by filter and effect
    #[serde(default)]
    pub intensity: Option<f32>,

    // adjust family
    #[serde(default)]
    pub brightness: Option<f32>,
    #[serde(default)]
    pub contrast: Option<f32>,
    #[serde(default)]
    pub saturation: Option<f32>,
    #[serde(default)]
    pub hue_rotation: Option<f32>,

    // transform family
    #[serde(default)]
    pub resize: Option<ResizeRequest>,
    #[serde(default)]
    pub crop: Option<CropRequest>,
    #[serde(default)]
    pub rotate: Option<u32>,
    #[serde(default)]
    pub flip: Option<FlipRequest>,

    // cross-cutting output options
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default)]
    pub output_as_binary: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResizeRequest {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default = "default_keep_aspect_ratio")]
    pub keep_aspect_ratio: bool,
}

fn default_keep_aspect_ratio() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropRequest {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlipRequest {
    #[serde(default)]
    pub horizontal: bool,
    #[serde(default)]
    pub vertical: bool,
}

impl ProcessRequest {
    /// Check field combinations and numeric ranges, producing the validated
    /// operation the dispatcher routes on.
    pub fn validate(&self) -> Result<Operation, ProcessingError> {
        self.reject_foreign_fields()?;

        if let Some(quality) = self.quality
            && !(1..=100).contains(&quality)
        {
            return Err(ProcessingError::InvalidParameter(format!(
                "quality must be between 1 and 100, got {quality}"
            )));
        }

        match self.operation {
            OperationKind::Filter => {
                let name = self.filter.clone().ok_or_else(|| {
                    ProcessingError::InvalidParameter(
                        "filter operation requires a filter name".to_string(),
                    )
                })?;
                let intensity =
                    check_range("intensity", self.intensity.unwrap_or(1.0), 0.0, 2.0)?;
                Ok(Operation::Filter { name, intensity })
            }
            OperationKind::Effect => {
                let name = self.effect.clone().ok_or_else(|| {
                    ProcessingError::InvalidParameter(
                        "effect operation requires an effect name".to_string(),
                    )
                })?;
                let intensity =
                    check_range("intensity", self.intensity.unwrap_or(0.5), 0.0, 1.0)?;
                Ok(Operation::Effect { name, intensity })
            }
            OperationKind::Adjust => Ok(Operation::Adjust(AdjustSpec {
                brightness: check_range("brightness", self.brightness.unwrap_or(1.0), 0.0, 3.0)?,
                contrast: check_range("contrast", self.contrast.unwrap_or(1.0), 0.0, 3.0)?,
                saturation: check_range("saturation", self.saturation.unwrap_or(1.0), 0.0, 3.0)?,
                hue_rotation: check_range(
                    "hue_rotation",
                    self.hue_rotation.unwrap_or(0.0),
                    -180.0,
                    180.0,
                )?,
            })),
            OperationKind::Transform => {
                if self.resize.is_none()
                    && self.crop.is_none()
                    && self.rotate.is_none()
                    && self.flip.is_none()
                {
                    return Err(ProcessingError::InvalidParameter(
                        "transform operation requires at least one of resize, crop, rotate, flip"
                            .to_string(),
                    ));
                }

                let rotate = match self.rotate {
                    None => None,
                    Some(degrees) => Some(Rotation::from_degrees(degrees).ok_or_else(|| {
                        ProcessingError::InvalidParameter(format!(
                            "rotate must be 90, 180 or 270, got {degrees}"
                        ))
                    })?),
                };

                if let Some(resize) = &self.resize
                    && resize.width.is_none()
                    && resize.height.is_none()
                {
                    return Err(ProcessingError::InvalidParameter(
                        "resize requires a width or a height".to_string(),
                    ));
                }

                Ok(Operation::Transform(TransformSpec {
                    crop: self.crop.map(|c| CropRegion {
                        x: c.x,
                        y: c.y,
                        width: c.width,
                        height: c.height,
                    }),
                    resize: self.resize.map(|r| ResizeSpec {
                        width: r.width,
                        height: r.height,
                        keep_aspect_ratio: r.keep_aspect_ratio,
                    }),
                    rotate,
                    flip: self
                        .flip
                        .map(|f| FlipSpec {
                            horizontal: f.horizontal,
                            vertical: f.vertical,
                        })
                        .unwrap_or_default(),
                }))
            }
        }
    }

    /// Reject fields that belong to a different operation family.
    fn reject_foreign_fields(&self) -> Result<(), ProcessingError> {
        let mut present: Vec<&'static str> = Vec::new();
        if self.filter.is_some() {
            present.push("filter");
        }
        if self.effect.is_some() {
            present.push("effect");
        }
        if self.intensity.is_some() {
            present.push("intensity");
        }
        if self.brightness.is_some() {
            present.push("brightness");
        }
        if self.contrast.is_some() {
            present.push("contrast");
        }
        if self.saturation.is_some() {
            present.push("saturation");
        }
        if self.hue_rotation.is_some() {
            present.push("hue_rotation");
        }
        if self.resize.is_some() {
            present.push("resize");
        }
        if self.crop.is_some() {
            present.push("crop");
        }
        if self.rotate.is_some() {
            present.push("rotate");
        }
        if self.flip.is_some() {
            present.push("flip");
        }

        let allowed: &[&str] = match self.operation {
            OperationKind::Filter => &["filter", "intensity"],
            OperationKind::Effect => &["effect", "intensity"],
            OperationKind::Adjust => &["brightness", "contrast", "saturation", "hue_rotation"],
            OperationKind::Transform => &["resize", "crop", "rotate", "flip"],
        };

        let foreign: Vec<&str> = present
            .into_iter()
            .filter(|field| !allowed.contains(field))
            .collect();
        if foreign.is_empty() {
            Ok(())
        } else {
            Err(ProcessingError::InvalidParameter(format!(
                "field(s) not valid for {:?} operation: {}",
                self.operation,
                foreign.join(", ")
            )))
        }
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<f32, ProcessingError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ProcessingError::InvalidParameter(format!(
            "{name} must be between {min} and {max}, got {value}"
        )))
    }
}

/// Metadata describing the actual output, never the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: usize,
    pub processing_time_ms: u128,
}

/// Result of a single processing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub success: bool,
    /// Data URL by default; raw base64 when `output_as_binary` was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    pub fn failure(error: &ProcessingError) -> Self {
        Self::failure_message(error.to_string())
    }

    pub fn failure_message(message: String) -> Self {
        Self {
            success: false,
            image_data: None,
            binary_data: None,
            metadata: None,
            error: Some(message),
        }
    }
}

/// Aggregate result of a batch run. `results` mirrors input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ProcessingResult>,
    pub total_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProcessRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_filter_request() {
        let request = parse(
            r#"{"operation": "filter", "filter": "grayscale", "intensity": 1.0, "output_format": "png"}"#,
        );
        let op = request.validate().unwrap();
        assert_eq!(
            op,
            Operation::Filter {
                name: "grayscale".to_string(),
                intensity: 1.0
            }
        );
    }

    #[test]
    fn parses_transform_request_with_nested_fields() {
        let request = parse(
            r#"{
                "operation": "transform",
                "resize": {"width": 100, "height": 50},
                "crop": {"x": 0, "y": 0, "width": 10, "height": 10},
                "rotate": 90,
                "flip": {"horizontal": true}
            }"#,
        );
        let Operation::Transform(spec) = request.validate().unwrap() else {
            panic!("expected transform");
        };
        assert!(spec.resize.unwrap().keep_aspect_ratio); // defaults on
        assert_eq!(spec.rotate, Some(Rotation::Deg90));
        assert!(spec.flip.horizontal);
        assert!(!spec.flip.vertical);
    }

    #[test]
    fn unknown_json_field_is_rejected() {
        let result = serde_json::from_str::<ProcessRequest>(
            r#"{"operation": "filter", "filter": "sepia", "sharpness": 3}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn foreign_field_is_rejected() {
        let request = parse(r#"{"operation": "filter", "filter": "sepia", "brightness": 1.5}"#);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("brightness"));
    }

    #[test]
    fn effect_accepts_unused_intensity() {
        // Documented permissive case: intensity on a non-threshold effect.
        let request = parse(r#"{"operation": "effect", "effect": "emboss", "intensity": 0.7}"#);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn filter_without_name_is_rejected() {
        let request = parse(r#"{"operation": "filter"}"#);
        let result = request.validate();
        assert!(matches!(result, Err(ProcessingError::InvalidParameter(_))));
    }

    #[test]
    fn filter_intensity_out_of_range_is_rejected() {
        let request = parse(r#"{"operation": "filter", "filter": "sepia", "intensity": 2.5}"#);
        assert!(request.validate().is_err());
    }

    #[test]
    fn effect_intensity_has_tighter_range() {
        let request = parse(r#"{"operation": "effect", "effect": "threshold", "intensity": 1.5}"#);
        assert!(request.validate().is_err());
    }

    #[test]
    fn adjust_defaults_to_identity() {
        let request = parse(r#"{"operation": "adjust", "contrast": 1.4}"#);
        let Operation::Adjust(spec) = request.validate().unwrap() else {
            panic!("expected adjust");
        };
        assert_eq!(spec.brightness, 1.0);
        assert_eq!(spec.contrast, 1.4);
        assert_eq!(spec.hue_rotation, 0.0);
    }

    #[test]
    fn hue_rotation_range_is_symmetric() {
        let ok = parse(r#"{"operation": "adjust", "hue_rotation": -180}"#);
        assert!(ok.validate().is_ok());
        let bad = parse(r#"{"operation": "adjust", "hue_rotation": 181}"#);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn arbitrary_rotation_angle_is_rejected() {
        let request = parse(r#"{"operation": "transform", "rotate": 45}"#);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("rotate"));
    }

    #[test]
    fn empty_transform_is_rejected() {
        let request = parse(r#"{"operation": "transform"}"#);
        assert!(request.validate().is_err());
    }

    #[test]
    fn resize_without_any_dimension_is_rejected() {
        let request =
            parse(r#"{"operation": "transform", "resize": {"keep_aspect_ratio": true}}"#);
        assert!(request.validate().is_err());
    }

    #[test]
    fn quality_out_of_range_is_rejected() {
        let request = parse(r#"{"operation": "filter", "filter": "sepia", "quality": 0}"#);
        assert!(request.validate().is_err());
    }

    #[test]
    fn output_format_defaults_to_png() {
        let request = parse(r#"{"operation": "filter", "filter": "sepia"}"#);
        assert_eq!(request.output_format, OutputFormat::Png);
        assert!(!request.output_as_binary);
    }

    #[test]
    fn webp_output_format_parses() {
        let request = parse(r#"{"operation": "filter", "filter": "sepia", "output_format": "webp"}"#);
        assert_eq!(request.output_format, OutputFormat::WebP);
    }

    #[test]
    fn failure_result_carries_message_only() {
        let result =
            ProcessingResult::failure(&ProcessingError::UnknownFilter("nope".to_string()));
        assert!(!result.success);
        assert!(result.image_data.is_none());
        assert!(result.binary_data.is_none());
        assert!(result.metadata.is_none());
        assert!(result.error.unwrap().contains("filter"));
    }
}

// Wire types exchanged with the detection service. Field names on the wire
// are camelCase; serde renames keep the Rust side snake_case.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Full result of one detection run, produced wholesale by the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub original_image: String,
    pub processed_image: String,
    pub detections: Vec<Detection>,
    /// Server-side processing time in milliseconds.
    pub processing_time: f64,
    pub model_confidence: f64,
}

/// One defect instance found in the image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DefectType,
    pub confidence: f64,
    pub bbox: BoundingBox,
    pub severity: Severity,
}

/// Bounding box in whatever units the server uses (pixels for the
/// reference backend).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Defect class. Anything the client does not know about is `Other`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum DefectType {
    Pothole,
    Crack,
    Other,
}

impl DefectType {
    pub fn as_str(self) -> &'static str {
        match self {
            DefectType::Pothole => "pothole",
            DefectType::Crack => "crack",
            DefectType::Other => "other",
        }
    }

    /// Capitalised label used in the details list.
    pub fn label(self) -> &'static str {
        match self {
            DefectType::Pothole => "Pothole",
            DefectType::Crack => "Crack",
            DefectType::Other => "Other",
        }
    }
}

impl From<String> for DefectType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pothole" => DefectType::Pothole,
            "crack" => DefectType::Crack,
            _ => DefectType::Other,
        }
    }
}

impl Serialize for DefectType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for DefectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse triage label assigned by the service.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope returned by `POST /detect`. `data` is present iff `success`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<DetectionResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /health`. Extra fields are ignored.
#[derive(Deserialize, Debug, Clone)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// Terminal views. Each function returns the panel as a string so the UI
// loop only has to print it.

use crate::data_uri::DataUri;
use crate::state::{AppState, Phase};
use crate::types::{DefectType, DetectionResult, Severity};
use crossterm::style::{StyledContent, Stylize};

pub fn render_header(health: Option<bool>) -> String {
    let status = match health {
        Some(true) => "● service healthy".green(),
        Some(false) => "● service unavailable".red(),
        None => "● service not checked".dark_grey(),
    };
    [
        format!("{}", "Road Defect Detection".bold()),
        "AI-powered pavement analysis".to_string(),
        format!("Powered by Edge YOLO  {}", status),
    ]
    .join("\n")
}

pub fn render_upload_panel(state: &AppState) -> String {
    let mut lines = vec![format!("{}", "Upload Road Image".bold())];
    match state.selected() {
        Some(image) => lines.push(format!("  {} ({} MB)", image.name(), image.size_mb())),
        None => lines.push("  Supports JPG, PNG, WEBP (max 10MB)".to_string()),
    }
    lines.push(String::new());
    lines.push("Detection Capabilities".to_string());
    lines.push(format!("  {} Potholes", type_marker(DefectType::Pothole)));
    lines.push(format!("  {} Cracks", type_marker(DefectType::Crack)));
    lines.push(format!("  {} Other defects", type_marker(DefectType::Other)));
    lines.join("\n")
}

pub fn render_results(state: &AppState) -> String {
    match state.phase() {
        Phase::Loading => ["Analyzing image...", "This may take a few seconds"].join("\n"),
        Phase::Failed(message) => format!("{}\n{}", "Error".red().bold(), message),
        Phase::Idle => [
            "No Results Yet",
            "Upload and analyze an image to see detection results",
        ]
        .join("\n"),
        Phase::Success(result) => render_success(state, result),
    }
}

fn render_success(state: &AppState, result: &DetectionResult) -> String {
    let mut lines = vec![
        format!("{}", "Detection Results".bold()),
        format!("  Detections:       {}", result.detections.len()),
        format!("  Processing Time:  {}ms", result.processing_time),
        format!("  Model Confidence: {}", percent(result.model_confidence)),
        String::new(),
    ];

    let view = state.view();
    let image = state
        .displayed_image()
        .map(describe_image)
        .unwrap_or_else(|| "unavailable".to_string());
    lines.push(format!("{}: {}", view.label(), image));

    if !result.detections.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", "Detection Details".bold()));
        for detection in &result.detections {
            lines.push(format!(
                "  {} {:<8} Confidence: {:>6}  {}",
                type_marker(detection.kind),
                detection.kind.label(),
                percent(detection.confidence),
                severity_badge(detection.severity),
            ));
        }
    }
    lines.join("\n")
}

pub fn render_model_info(info: Option<&serde_json::Value>) -> String {
    info.and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_else(|| "Model information unavailable".to_string())
}

/// Fraction in [0,1] as a percentage with one decimal.
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn describe_image(uri: &str) -> String {
    match DataUri::parse(uri) {
        Ok(parsed) => format!("{}, {} bytes", parsed.mime(), parsed.decoded_len()),
        Err(_) => "not an inline image".to_string(),
    }
}

fn type_marker(kind: DefectType) -> StyledContent<&'static str> {
    match kind {
        DefectType::Pothole => "●".red(),
        DefectType::Crack => "●".yellow(),
        DefectType::Other => "●".grey(),
    }
}

fn severity_badge(severity: Severity) -> StyledContent<&'static str> {
    match severity {
        Severity::High => severity.as_str().red(),
        Severity::Medium => severity.as_str().yellow(),
        Severity::Low => severity.as_str().green(),
    }
}

// HTTP contract tests against a throwaway single-connection server. No
// mocking crate is in the dependency stack, so a std `TcpListener` thread
// reads one request (headers plus Content-Length body) and writes a canned
// response.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use roadscan_cli::api::ApiClient;
use roadscan_cli::config::ClientConfig;
use roadscan_cli::error::{DetectError, CONNECTION_FAILED};
use roadscan_cli::state::{analyze, AppState};
use roadscan_cli::upload::ImageFile;

const SUCCESS_BODY: &str = r#"{
    "success": true,
    "data": {
        "originalImage": "data:image/jpeg;base64,AAEC",
        "processedImage": "data:image/jpeg;base64,AwQF",
        "detections": [
            {"id": "1", "type": "pothole", "confidence": 0.95,
             "bbox": {"x": 100, "y": 150, "width": 200, "height": 100}, "severity": "high"},
            {"id": "2", "type": "crack", "confidence": 0.87,
             "bbox": {"x": 300, "y": 200, "width": 150, "height": 50}, "severity": "medium"}
        ],
        "processingTime": 1002,
        "modelConfidence": 0.92
    }
}"#;

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
            let len = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + len {
                break;
            }
        }
    }
    buf
}

/// Serve one request with `status` and `body`, then hand the raw request
/// back through the channel. `delay` is slept before answering.
fn serve_once(status: &'static str, body: &'static str, delay: Duration) -> (String, mpsc::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let _ = tx.send(request);
        thread::sleep(delay);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
    });
    (format!("http://{}/api", addr), rx)
}

fn client(api_url: &str, timeout_ms: u64) -> ApiClient {
    let config = ClientConfig::default()
        .with_overrides(Some(api_url.to_string()), Some(timeout_ms))
        .unwrap();
    ApiClient::new(config).unwrap()
}

fn image() -> ImageFile {
    ImageFile::from_bytes("road.png", "image/png", vec![0x89, b'P', b'N', b'G', 1, 2, 3]).unwrap()
}

#[test]
fn detect_uploads_multipart_image_field() {
    let (url, rx) = serve_once("200 OK", SUCCESS_BODY, Duration::ZERO);
    let result = client(&url, 5_000).detect_defects(&image()).expect("detect");

    assert_eq!(result.detections.len(), 2);
    assert_eq!(result.detections[0].id, "1");
    assert_eq!(result.detections[1].id, "2");
    assert_eq!(result.model_confidence, 0.92);

    let request = String::from_utf8_lossy(&rx.recv().unwrap()).to_string();
    assert!(request.starts_with("POST /api/detect "));
    assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
    assert!(request.contains("name=\"image\""));
    assert!(request.contains("filename=\"road.png\""));
    assert!(request.contains("Content-Type: image/png"));
}

#[test]
fn application_failure_message_is_passed_through() {
    let (url, _rx) = serve_once("200 OK", r#"{"success":false,"error":"X"}"#, Duration::ZERO);
    let err = client(&url, 5_000).detect_defects(&image()).unwrap_err();
    assert!(matches!(err, DetectError::Application(_)));
    assert_eq!(err.to_string(), "X");
}

#[test]
fn payload_too_large_ignores_body() {
    let (url, _rx) = serve_once("413 Payload Too Large", r#"{"error":"nope"}"#, Duration::ZERO);
    let err = client(&url, 5_000).detect_defects(&image()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Image file is too large. Please use an image smaller than 10MB."
    );
}

#[test]
fn unsupported_media_type_ignores_body() {
    let (url, _rx) = serve_once(
        "415 Unsupported Media Type",
        r#"{"success":false,"error":"Invalid file type. Please upload an image."}"#,
        Duration::ZERO,
    );
    let err = client(&url, 5_000).detect_defects(&image()).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported image format. Please use JPG, PNG, or WEBP.");
}

#[test]
fn server_error_is_generic() {
    let (url, _rx) = serve_once(
        "500 Internal Server Error",
        r#"{"success":false,"error":"Detection failed: cuda oom"}"#,
        Duration::ZERO,
    );
    let err = client(&url, 5_000).detect_defects(&image()).unwrap_err();
    assert_eq!(err.to_string(), "Server error. Please try again later.");
}

#[test]
fn bad_request_uses_server_message() {
    let (url, _rx) = serve_once(
        "400 Bad Request",
        r#"{"success":false,"error":"No image file provided"}"#,
        Duration::ZERO,
    );
    let err = client(&url, 5_000).detect_defects(&image()).unwrap_err();
    assert_eq!(err.to_string(), "No image file provided");
}

#[test]
fn slow_server_yields_timeout_message() {
    let (url, _rx) = serve_once("200 OK", SUCCESS_BODY, Duration::from_secs(3));
    let err = client(&url, 300).detect_defects(&image()).unwrap_err();
    assert!(matches!(err, DetectError::Timeout));
    assert_eq!(
        err.to_string(),
        "Request timeout. The model is taking too long to process the image."
    );
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

#[test]
fn refused_connection_yields_generic_message() {
    let err = client(&closed_port_url(), 2_000).detect_defects(&image()).unwrap_err();
    assert_eq!(err.to_string(), CONNECTION_FAILED);
}

#[test]
fn health_is_true_only_for_healthy_status() {
    let (url, rx) = serve_once("200 OK", r#"{"status":"healthy","model_loaded":true}"#, Duration::ZERO);
    assert!(client(&url, 2_000).check_model_health());
    let request = String::from_utf8_lossy(&rx.recv().unwrap()).to_string();
    assert!(request.starts_with("GET /api/health "));

    let (url, _rx) = serve_once("200 OK", r#"{"status":"loading"}"#, Duration::ZERO);
    assert!(!client(&url, 2_000).check_model_health());

    let (url, _rx) = serve_once("503 Service Unavailable", r#"{"status":"healthy"}"#, Duration::ZERO);
    assert!(!client(&url, 2_000).check_model_health());

    assert!(!client(&closed_port_url(), 2_000).check_model_health());
}

#[test]
fn model_info_is_passed_through_or_none() {
    let (url, _rx) = serve_once(
        "200 OK",
        r#"{"model_name":"edge-yolo-road-defects","version":"1.0.0","classes":["pothole","crack","other"]}"#,
        Duration::ZERO,
    );
    let info = client(&url, 2_000).get_model_info().expect("model info");
    assert_eq!(info["version"], "1.0.0");
    assert_eq!(info["classes"].as_array().unwrap().len(), 3);

    let (url, _rx) = serve_once("404 Not Found", "{}", Duration::ZERO);
    assert!(client(&url, 2_000).get_model_info().is_none());

    assert!(client(&closed_port_url(), 2_000).get_model_info().is_none());
}

#[test]
fn analyze_flow_replaces_error_with_result() {
    let (url, _rx) = serve_once("200 OK", SUCCESS_BODY, Duration::ZERO);
    let api = client(&url, 5_000);

    let mut state = AppState::new();
    state.fail("previous failure");
    state.select_image(image());
    analyze(&mut state, &api).unwrap();

    assert!(state.error().is_none());
    assert_eq!(state.result().unwrap().detections.len(), 2);
    assert_eq!(state.displayed_image(), Some("data:image/jpeg;base64,AwQF"));
}

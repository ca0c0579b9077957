// UI state holder. Result and error live in one `Phase` enum so that
// setting one always clears the other.

use crate::api::Detector;
use crate::error::ValidationError;
use crate::types::DetectionResult;
use crate::upload::ImageFile;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success(DetectionResult),
    Failed(String),
}

/// Which of the two result images is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageView {
    #[default]
    Processed,
    Original,
}

impl ImageView {
    pub fn label(self) -> &'static str {
        match self {
            ImageView::Processed => "Processed Image",
            ImageView::Original => "Original Image",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ImageView::Processed => ImageView::Original,
            ImageView::Original => ImageView::Processed,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Select an image before analyzing")]
    NoImageSelected,
    #[error("An analysis is already in progress")]
    AnalysisInFlight,
}

#[derive(Debug, Default)]
pub struct AppState {
    selected: Option<ImageFile>,
    phase: Phase,
    view: ImageView,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_image(&mut self, image: ImageFile) {
        self.selected = Some(image);
    }

    /// A file was refused before upload. Shown like any other error; the
    /// previous selection, if any, is kept.
    pub fn reject_selection(&mut self, err: &ValidationError) {
        self.fail(err.to_string());
    }

    /// Enter `Loading` and hand back the image to upload.
    pub fn begin_analysis(&mut self) -> Result<ImageFile, StateError> {
        if self.is_loading() {
            return Err(StateError::AnalysisInFlight);
        }
        let image = self.selected.clone().ok_or(StateError::NoImageSelected)?;
        self.phase = Phase::Loading;
        Ok(image)
    }

    pub fn complete(&mut self, result: DetectionResult) {
        self.phase = Phase::Success(result);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = Phase::Failed(message.into());
    }

    /// Drop the selected image and go back to `Idle`.
    pub fn clear_input(&mut self) {
        self.selected = None;
        self.phase = Phase::Idle;
    }

    pub fn set_view(&mut self, view: ImageView) {
        self.view = view;
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected(&self) -> Option<&ImageFile> {
        self.selected.as_ref()
    }

    pub fn view(&self) -> ImageView {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        match &self.phase {
            Phase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Data URI of the image for the current view, if there is a result.
    pub fn displayed_image(&self) -> Option<&str> {
        self.result().map(|r| match self.view {
            ImageView::Processed => r.processed_image.as_str(),
            ImageView::Original => r.original_image.as_str(),
        })
    }
}

/// Run one analyze cycle: `Loading`, then `Success` or `Failed`.
pub fn analyze<D: Detector + ?Sized>(state: &mut AppState, detector: &D) -> Result<(), StateError> {
    let image = state.begin_analysis()?;
    match detector.detect(&image) {
        Ok(result) => {
            log::debug!("analysis found {} detections", result.detections.len());
            state.complete(result);
        }
        Err(err) => {
            log::debug!("analysis failed: {:?}", err);
            state.fail(err.to_string());
        }
    }
    Ok(())
}

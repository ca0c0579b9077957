// UI layer: an interactive menu built on `dialoguer`. Every iteration
// re-renders the panels from `AppState`, then routes the chosen action.

use crate::api::ApiClient;
use crate::data_uri::{self, DEFAULT_SAVE_STEM};
use crate::render::{render_header, render_model_info, render_results, render_upload_panel};
use crate::state::{analyze, AppState};
use crate::upload::ImageFile;
use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu(api: ApiClient, initial_image: Option<PathBuf>) -> Result<()> {
    let mut state = AppState::new();
    let mut health = None;
    if let Some(path) = initial_image {
        select_path(&mut state, &path);
    }

    loop {
        println!();
        println!("{}", render_header(health));
        println!();
        println!("{}", render_upload_panel(&state));
        println!();
        println!("{}", render_results(&state));
        println!();

        let items = vec![
            "Select image (type path)",
            "Select image (browse)",
            "Analyze image",
            "Toggle processed/original view",
            "Save displayed image",
            "Check service health",
            "Show model info",
            "Clear image",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                let path: String = Input::new().with_prompt("Image file path").interact_text()?;
                select_path(&mut state, Path::new(path.trim()));
            }
            1 => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file();
                if let Some(path) = picked {
                    select_path(&mut state, &path);
                }
            }
            2 => analyze_with_spinner(&mut state, &api)?,
            3 => state.toggle_view(),
            4 => save_displayed(&state)?,
            5 => {
                let spinner = spinner("Checking service health...")?;
                health = Some(api.check_model_health());
                spinner.finish_and_clear();
            }
            6 => {
                let spinner = spinner("Fetching model info...")?;
                let info = api.get_model_info();
                spinner.finish_and_clear();
                println!("{}", render_model_info(info.as_ref()));
            }
            7 => state.clear_input(),
            8 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Non-interactive mode: analyze one image, print the results panel and
/// report whether the analysis succeeded.
pub fn run_once(api: &ApiClient, path: &Path) -> Result<bool> {
    let mut state = AppState::new();
    select_path(&mut state, path);
    if state.selected().is_some() {
        analyze_with_spinner(&mut state, api)?;
    }
    println!("{}", render_results(&state));
    Ok(state.result().is_some())
}

fn select_path(state: &mut AppState, path: &Path) {
    match ImageFile::from_path(path) {
        Ok(image) => state.select_image(image),
        Err(err) => {
            log::debug!("rejected {}: {:?}", path.display(), err);
            state.reject_selection(&err);
        }
    }
}

fn analyze_with_spinner(state: &mut AppState, api: &ApiClient) -> Result<()> {
    let spinner = spinner("Analyzing image...")?;
    let outcome = analyze(state, api);
    spinner.finish_and_clear();
    if let Err(e) = outcome {
        println!("{}", e);
    }
    Ok(())
}

fn save_displayed(state: &AppState) -> Result<()> {
    let Some(uri) = state.displayed_image() else {
        println!("Nothing to save yet. Analyze an image first.");
        return Ok(());
    };
    let dir: String = Input::new()
        .with_prompt("Save to directory")
        .default(data_uri::default_save_dir().display().to_string())
        .interact_text()?;
    match data_uri::save_image(uri, Path::new(dir.trim()), DEFAULT_SAVE_STEM) {
        Ok(path) => println!("Saved {}", path.display()),
        Err(e) => println!("Save failed: {:#}", e),
    }
    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

// Library root
// -----------
// This crate exposes the pieces the `roadscan` binary is built from.
//
// Module responsibilities:
// - `api`: HTTP interactions with the detection service (detect, health,
//   model info) and classification of their failures.
// - `state`: the UI state holder (idle / loading / success / failed).
// - `upload`: image selection and client-side validation.
// - `types`, `error`, `data_uri`: wire types, error taxonomy, inline images.
// - `config`: defaults, config file and environment layering.
// - `render` and `ui`: terminal views and the interactive menu.
pub mod api;
pub mod config;
pub mod data_uri;
pub mod error;
pub mod render;
pub mod state;
pub mod types;
pub mod ui;
pub mod upload;

//! Error types surfaced to the user as alerts.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickerError {
    /// The dropped or picked file is not an image.
    #[error("Not an image file: {0}")]
    InvalidFileType(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Copy or send was requested with no boxes drawn.
    #[error("No boxes to export")]
    EmptyStore,

    #[error("No webhook URL configured")]
    MissingEndpoint,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered, but not with `{"result": "success"}`.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<arboard::Error> for PickerError {
    fn from(e: arboard::Error) -> Self {
        PickerError::Clipboard(e.to_string())
    }
}

impl PickerError {
    /// Text for the blocking alert window.
    pub fn alert_message(&self) -> String {
        match self {
            PickerError::InvalidFileType(_) => "Only image files can be loaded.".to_string(),
            PickerError::ImageDecode(e) => format!("Could not read the image: {e}"),
            PickerError::Io(e) => format!("Could not read the file: {e}"),
            PickerError::EmptyStore => "There are no boxes to export.".to_string(),
            PickerError::MissingEndpoint => "Enter the spreadsheet web app URL first.".to_string(),
            PickerError::Clipboard(_) => "Copying to the clipboard failed.".to_string(),
            PickerError::Http(_) | PickerError::UnexpectedResponse(_) => {
                "Sending failed, or the response could not be read \
                 (the endpoint may have blocked it).\n\n\
                 Check the sheet: if the rows arrived, the export succeeded."
                    .to_string()
            }
        }
    }
}

pub type Result<T, E = PickerError> = std::result::Result<T, E>;

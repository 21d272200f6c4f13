//! Extract text from screenshots with OCR and run word frequency analysis
//! over it.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ocr;
pub mod scan;
pub mod sink;
pub mod text;

pub use error::{Result, WcrackError};

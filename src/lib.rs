//! Fashion social toolkit - AI captions and outfit mood scores for photos
//!
//! Uploads an outfit photo to a multimodal model to either write an Instagram
//! caption for a given style or score the outfit against six mood categories.
//! Both tools always answer: model failures fall back to local results.

pub mod ai;
pub mod app;
pub mod caption;
pub mod error;
pub mod image;
pub mod models;
pub mod mood;
pub mod prompts;
pub mod random;
pub mod report;

pub use error::{Error, Result};

#![forbid(unsafe_code)]

//! Runtime for scrolltext: the producer thread, tap handling, presentation,
//! and configuration.
//!
//! A [`Viewer`] owns one [`Scene`] (render context plus presenter) behind a
//! single lock. [`Viewer::spawn_producer`] starts a named thread that appends
//! one string per interval from any `Iterator<Item = String>`, such as
//! [`NumberWords`]. [`Viewer::tap`] draws a fixed string at a position and
//! stops the producer.

pub mod cancel;
pub mod config;
pub mod error;
pub mod number_words;
pub mod present;
pub mod producer;
pub mod viewer;

pub use cancel::CancelToken;
pub use config::{DEFAULT_DPI, DEFAULT_FACE, DEFAULT_TAP_TEXT, ViewerConfig};
pub use error::ViewerError;
pub use number_words::{NumberWords, number_to_words};
pub use present::{HeadlessPresenter, PresentError, Presenter};
pub use producer::{ProducerExit, ProducerReport};
pub use viewer::{Scene, Viewer};

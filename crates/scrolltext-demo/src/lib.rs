#![forbid(unsafe_code)]

//! Headless scrolltext demo.
//!
//! Feeds English numerals through a [`scrolltext_runtime::Viewer`] backed by a
//! [`scrolltext_runtime::HeadlessPresenter`], then exports the last presented
//! frame as a PPM image and the run as a JSON [`run::RunSummary`].

pub mod cli;
pub mod run;

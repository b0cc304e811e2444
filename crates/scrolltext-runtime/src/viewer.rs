#![forbid(unsafe_code)]

//! The viewer: a shared scene driven by a producer thread and input events.
//!
//! # Locking
//!
//! One `Mutex` guards the [`Scene`]. Each logical update (glyph lookups, line
//! counting, the scroll decision, and the blit) happens inside one critical
//! section, and presentation takes the same lock for its copy, so no actor
//! ever sees a partial frame. There is no other lock.
//!
//! # Stopping
//!
//! [`Viewer::stop`] cancels the producer's token and joins the thread. The
//! producer notices at its next iteration boundary or wakes from its wait
//! early. Stopping twice is harmless.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use scrolltext_render::{FontEngine, PixelFormat, PixelSurface, RenderContext};
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::present::Presenter;
use crate::producer::{self, ProducerReport};

/// State shared between the producer and the event side.
#[derive(Debug)]
pub struct Scene<E: FontEngine, P> {
    pub ctx: RenderContext<E>,
    pub presenter: P,
}

impl<E: FontEngine, P: Presenter> Scene<E, P> {
    /// Hand the current surface to the presenter.
    pub fn present(&mut self) -> Result<(), ViewerError> {
        self.presenter.present(self.ctx.surface())?;
        Ok(())
    }
}

pub(crate) fn lock<E: FontEngine, P>(
    scene: &Mutex<Scene<E, P>>,
) -> Result<MutexGuard<'_, Scene<E, P>>, ViewerError> {
    scene.lock().map_err(|_| ViewerError::Poisoned)
}

pub struct Viewer<E: FontEngine, P> {
    scene: Arc<Mutex<Scene<E, P>>>,
    config: ViewerConfig,
    token: CancelToken,
    producer: Option<JoinHandle<ProducerReport>>,
    report: Option<ProducerReport>,
}

impl<E, P> Viewer<E, P>
where
    E: FontEngine + Send + 'static,
    E::Face: Send,
    P: Presenter + Send + 'static,
{
    /// Build the scene and load the configured face.
    pub fn new(
        engine: E,
        surface: PixelSurface,
        presenter: P,
        config: ViewerConfig,
    ) -> Result<Self, ViewerError> {
        let mut ctx = RenderContext::new(engine, surface);
        ctx.configure_viewport(config.margin_y, config.line_gap);
        ctx.load_face(&config.face_path, config.point_size, config.dpi)?;
        info!(
            face = %config.face_path.display(),
            max_lines = ctx.viewport().max_lines(),
            block_width = config.block_width(ctx.surface().width()),
            "viewer ready"
        );
        Ok(Self {
            scene: Arc::new(Mutex::new(Scene { ctx, presenter })),
            config,
            token: CancelToken::new(),
            producer: None,
            report: None,
        })
    }

    /// Start the producer thread over `source`. A running producer is
    /// stopped first.
    pub fn spawn_producer<S>(&mut self, source: S) -> Result<(), ViewerError>
    where
        S: Iterator<Item = String> + Send + 'static,
    {
        self.stop();
        self.token = CancelToken::new();

        let scene = Arc::clone(&self.scene);
        let token = self.token.clone();
        let config = self.config.clone();
        let handle = thread::Builder::new()
            .name("scrolltext-producer".into())
            .spawn(move || producer::run(scene, source, token, config))
            .map_err(|err| ViewerError::Spawn(err.to_string()))?;
        self.producer = Some(handle);
        Ok(())
    }

    /// Draw the tap text at `(x, y)`, present it, then stop the producer.
    ///
    /// The producer is stopped even when drawing fails. Returns the number of
    /// lines drawn.
    pub fn tap(&mut self, x: i32, y: i32) -> Result<usize, ViewerError> {
        let drawn = self.draw_tap(x, y);
        self.stop();
        drawn
    }

    fn draw_tap(&self, x: i32, y: i32) -> Result<usize, ViewerError> {
        let lines = {
            let mut scene = lock(&self.scene)?;
            scene
                .ctx
                .render(self.config.tap_text.as_bytes(), x, y, self.config.tap_width)?
        };
        info!(x, y, lines, "tap drawn");
        self.present()?;
        Ok(lines)
    }

    /// Present the current surface.
    pub fn present(&self) -> Result<(), ViewerError> {
        lock(&self.scene)?.present()
    }

    /// Replace the surface after a host geometry change.
    pub fn resize(
        &self,
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<(), ViewerError> {
        lock(&self.scene)?
            .ctx
            .resize_surface(width, height, stride, format)?;
        Ok(())
    }

    /// Run `f` with exclusive access to the scene.
    pub fn with_scene<R>(&self, f: impl FnOnce(&mut Scene<E, P>) -> R) -> Result<R, ViewerError> {
        let mut scene = lock(&self.scene)?;
        Ok(f(&mut scene))
    }

    /// Stop the producer and wait for it to exit. Returns its report the
    /// first time it is joined.
    pub fn stop(&mut self) -> Option<ProducerReport> {
        self.token.cancel();
        self.join()
    }

    /// Wait for the producer to end on its own (source exhausted or failed).
    pub fn join(&mut self) -> Option<ProducerReport> {
        let handle = self.producer.take()?;
        let report = handle.join().unwrap_or_else(|_| {
            warn!("producer thread panicked");
            ProducerReport::panicked()
        });
        info!(exit = ?report.exit, appended = report.appended, "producer joined");
        self.report = Some(report.clone());
        Some(report)
    }

    /// Report of the most recently joined producer.
    #[must_use]
    pub fn report(&self) -> Option<&ProducerReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.producer
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Stop the producer, then drop cached glyphs and close the face.
    pub fn shutdown(mut self) -> Result<Option<ProducerReport>, ViewerError> {
        let report = self.stop();
        lock(&self.scene)?.ctx.shutdown();
        Ok(report)
    }
}

impl<E: FontEngine, P> Drop for Viewer<E, P> {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }
    }
}

#![forbid(unsafe_code)]

//! One headless demo run: build the viewer, feed it numerals, optionally tap,
//! then export what was presented.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::thread;
use std::time::Duration;

use scrolltext_render::{
    BlockFont, FontEngine, FontdueEngine, PixelFormat, PixelSurface, RenderError,
};
use scrolltext_runtime::{
    HeadlessPresenter, NumberWords, ProducerExit, ProducerReport, Viewer, ViewerConfig, ViewerError,
};
use serde::Serialize;
use tracing::{info, info_span};

use crate::cli::Opts;

/// Errors that end a demo run.
#[derive(Debug)]
pub enum DemoError {
    Render(RenderError),
    Viewer(ViewerError),
    Io { path: String, source: io::Error },
    Json(serde_json::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(err) => write!(f, "surface: {err}"),
            Self::Viewer(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{path}: {source}"),
            Self::Json(err) => write!(f, "summary: {err}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            Self::Viewer(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<RenderError> for DemoError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

impl From<ViewerError> for DemoError {
    fn from(err: ViewerError) -> Self {
        Self::Viewer(err)
    }
}

/// Machine-readable record of a run, written as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub face: String,
    pub engine: &'static str,
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub format: &'static str,
    pub line_height: i32,
    pub line_pitch: i32,
    pub max_lines: usize,
    pub occupied_lines: usize,
    pub blocks_appended: u64,
    pub blocks_dropped: u64,
    pub producer_exit: String,
    pub producer_ms: u64,
    pub frames_presented: u64,
    pub glyphs_cached: usize,
    pub glyph_hits: u64,
    pub glyph_misses: u64,
    pub tap_lines: Option<usize>,
}

impl RunSummary {
    /// Serialize as pretty JSON into `out`.
    pub fn write_json<W: Write>(&self, mut out: W) -> Result<(), DemoError> {
        serde_json::to_writer_pretty(&mut out, self).map_err(DemoError::Json)?;
        writeln!(out).map_err(|source| DemoError::Io {
            path: "summary".into(),
            source,
        })
    }
}

/// Run the demo described by `opts` with the engine its face selects.
pub fn run(opts: &Opts) -> Result<RunSummary, DemoError> {
    if opts.uses_builtin_face() {
        run_with(BlockFont::new(), "block", opts)
    } else {
        run_with(FontdueEngine::new(), "fontdue", opts)
    }
}

fn run_with<E>(engine: E, engine_name: &'static str, opts: &Opts) -> Result<RunSummary, DemoError>
where
    E: FontEngine + Send + 'static,
    E::Face: Send,
{
    let _span = info_span!("demo_run", engine = engine_name).entered();
    let surface = PixelSurface::new(opts.width, opts.height, opts.effective_stride(), opts.format)?;
    let config = ViewerConfig::default()
        .with_face(&opts.font)
        .with_point_size(opts.point_size)
        .with_dpi(opts.dpi)
        .with_margins(opts.margin_x, opts.margin_y)
        .with_line_gap(opts.line_gap)
        .with_interval(Duration::from_millis(opts.interval_ms));
    let mut viewer = Viewer::new(engine, surface, HeadlessPresenter::new(), config)?;

    let numerals = NumberWords::starting_at(opts.start);
    if opts.frames > 0 {
        viewer.spawn_producer(numerals.take(opts.frames as usize))?;
        viewer.join();
    } else {
        viewer.spawn_producer(numerals)?;
        thread::sleep(Duration::from_millis(opts.run_ms));
    }

    let tap_lines = match opts.tap {
        Some((x, y)) => Some(viewer.tap(x, y)?),
        None => {
            viewer.stop();
            None
        }
    };

    let report = viewer.report().cloned().unwrap_or_else(|| ProducerReport {
        exit: ProducerExit::Stopped,
        appended: 0,
        dropped: 0,
        elapsed: Duration::ZERO,
    });
    if let ProducerExit::Failed(err) = &report.exit {
        return Err(DemoError::Viewer(err.clone()));
    }

    let summary = viewer.with_scene(|scene| {
        let surface = scene.ctx.surface();
        let stats = scene.ctx.cache().stats();
        RunSummary {
            face: opts.font.clone(),
            engine: engine_name,
            width: surface.width(),
            height: surface.height(),
            stride: surface.stride(),
            format: format_name(surface.format()),
            line_height: scene.ctx.line_height(),
            line_pitch: scene.ctx.line_pitch(),
            max_lines: scene.ctx.viewport().max_lines(),
            occupied_lines: scene.ctx.viewport().occupied(),
            blocks_appended: report.appended,
            blocks_dropped: report.dropped,
            producer_exit: format!("{:?}", report.exit),
            producer_ms: report.elapsed.as_millis() as u64,
            frames_presented: scene.presenter.frames(),
            glyphs_cached: scene.ctx.cache().len(),
            glyph_hits: stats.hits,
            glyph_misses: stats.misses,
            tap_lines,
        }
    })?;

    if let Some(path) = &opts.snapshot {
        let written = viewer.with_scene(|scene| write_snapshot(&scene.presenter, path))?;
        written?;
        info!(path = %path, "snapshot written");
    }

    viewer.shutdown()?;
    info!(
        appended = summary.blocks_appended,
        dropped = summary.blocks_dropped,
        frames = summary.frames_presented,
        "run finished"
    );
    Ok(summary)
}

fn write_snapshot(presenter: &HeadlessPresenter, path: &str) -> Result<(), DemoError> {
    let io_err = |source| DemoError::Io {
        path: path.to_string(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    presenter.write_ppm(BufWriter::new(file)).map_err(io_err)
}

/// Write the summary to `target`, where `-` means stdout.
pub fn emit_summary(summary: &RunSummary, target: &str) -> Result<(), DemoError> {
    if target == "-" {
        return summary.write_json(io::stdout().lock());
    }
    let file = File::create(target).map_err(|source| DemoError::Io {
        path: target.to_string(),
        source,
    })?;
    summary.write_json(BufWriter::new(file))
}

fn format_name(format: PixelFormat) -> &'static str {
    match format {
        PixelFormat::Rgba8888 => "rgba8888",
        PixelFormat::Rgb565 => "rgb565",
    }
}

//! Explicit selection-change event loop.
//!
//! Each event updates the current [`Selection`], runs exactly one projection and hands
//! the finished result to a [`Renderer`] before the next event is looked at. There is
//! no queue: the latest selection is always the one rendered.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, warn};

use crate::data::DatasetStore;
use crate::projector::{recompute, ProjectionResult, ProjectorConfig, Region, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Country(String),
    Region(Region),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventParseError {
    #[error("expected 'country <name>' or 'region <name>', got '{0}'")]
    UnknownCommand(String),
    #[error(transparent)]
    Region(#[from] crate::projector::selection::UnknownRegion),
}

/// Parses one line of the `watch` protocol. Blank lines and `#` comments yield `None`.
///
/// The country name is taken verbatim after the first space so the store's match
/// policy decides how whitespace and case are treated.
pub fn parse_event(line: &str) -> Result<Option<SelectionEvent>, EventParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }
    let line = line.trim_start();
    let (command, rest) = line
        .split_once(|c: char| c.is_ascii_whitespace())
        .unwrap_or((line, ""));
    match command.to_ascii_lowercase().as_str() {
        "country" => Ok(Some(SelectionEvent::Country(rest.to_string()))),
        "region" => Ok(Some(SelectionEvent::Region(rest.parse()?))),
        _ => Err(EventParseError::UnknownCommand(line.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize projection: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write projection: {0}")]
    Io(#[from] io::Error),
}

/// Why [`Dispatcher::run`] stopped before the end of its input.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to read selection events: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The drawing side of the dashboard.
pub trait Renderer {
    fn render(&mut self, result: &ProjectionResult) -> Result<(), RenderError>;
}

/// Writes one compact JSON document per projection, newline terminated.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, result: &ProjectionResult) -> Result<(), RenderError> {
        serde_json::to_writer(&mut self.out, result)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps every rendered projection in memory.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<ProjectionResult>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, result: &ProjectionResult) -> Result<(), RenderError> {
        self.frames.push(result.clone());
        Ok(())
    }
}

pub struct Dispatcher<'a, R: Renderer> {
    store: &'a DatasetStore,
    config: &'a ProjectorConfig,
    selection: Selection,
    renderer: R,
}

impl<'a, R: Renderer> Dispatcher<'a, R> {
    pub fn new(
        store: &'a DatasetStore,
        config: &'a ProjectorConfig,
        selection: Selection,
        renderer: R,
    ) -> Self {
        Dispatcher {
            store,
            config,
            selection,
            renderer,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Renders the initial selection.
    pub fn start(&mut self) -> Result<(), RenderError> {
        self.render_current()
    }

    /// Applies one event and renders the resulting projection.
    pub fn dispatch(&mut self, event: SelectionEvent) -> Result<(), RenderError> {
        match event {
            SelectionEvent::Country(country) => self.selection.country = country,
            SelectionEvent::Region(region) => self.selection.region = region,
        }
        self.render_current()
    }

    /// Start, then one dispatch per parsed line until EOF. Bad lines, including lines that
    /// are not UTF-8, are logged and skipped. Returns the number of events dispatched.
    pub fn run<B: BufRead>(&mut self, mut input: B) -> Result<usize, DispatchError> {
        self.start()?;
        let mut dispatched = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .map_err(DispatchError::Read)?;
            if read == 0 {
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(err) => {
                    warn!(%err, "ignoring selection event that is not utf-8");
                    continue;
                }
            };
            match parse_event(line) {
                Ok(Some(event)) => {
                    self.dispatch(event)?;
                    dispatched += 1;
                }
                Ok(None) => {}
                Err(err) => warn!(%err, "ignoring selection event"),
            }
        }
        Ok(dispatched)
    }

    fn render_current(&mut self) -> Result<(), RenderError> {
        debug!(country = %self.selection.country, region = %self.selection.region, "recompute");
        let result = recompute(self.store, self.config, &self.selection);
        self.renderer.render(&result)
    }
}

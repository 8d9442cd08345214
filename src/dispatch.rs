//! Convert a description, hand it to a renderer, and fall back to text.
//!
//! Fallback chain: a description that cannot be converted is shown as raw
//! text; a notation document the renderer rejects is shown as text, and the
//! caller may retry or switch to the text view.

use crate::convert::{ConvertOptions, DiagramMode, to_notation_with};
use thiserror::Error;

/// Shown by the text view when there is nothing to show.
pub const NO_DATA: &str = "No data to display.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Render error: {0}")]
pub struct RenderError(pub String);

/// Where diagrams and text end up: a DOM container, a terminal, a test double.
pub trait Surface {
    fn render_diagram(&mut self, notation: &str) -> Result<(), RenderError>;
    fn show_text(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    /// The notation was shown as text instead; retry or view as text.
    RenderFailed(RenderError),
    /// The raw description was shown as text.
    ConversionFailed,
}

#[derive(Debug, Clone)]
struct Request {
    description: String,
    mode: DiagramMode,
}

pub struct Dispatcher<S> {
    surface: S,
    options: ConvertOptions,
    last_request: Option<Request>,
    last_notation: Option<String>,
}

impl<S: Surface> Dispatcher<S> {
    pub fn new(surface: S) -> Self {
        Self::with_options(surface, ConvertOptions::default())
    }

    pub fn with_options(surface: S, options: ConvertOptions) -> Self {
        Self {
            surface,
            options,
            last_request: None,
            last_notation: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Notation produced by the last successful conversion.
    pub fn last_notation(&self) -> Option<&str> {
        self.last_notation.as_deref()
    }

    pub fn show(&mut self, description: &str, mode: DiagramMode) -> Outcome {
        self.last_request = Some(Request {
            description: description.to_string(),
            mode,
        });

        let Some(notation) = to_notation_with(description, mode, &self.options) else {
            log::warn!("showing {mode:?} description as text");
            self.last_notation = None;
            self.surface.show_text(description);
            return Outcome::ConversionFailed;
        };

        let outcome = match self.surface.render_diagram(&notation) {
            Ok(()) => Outcome::Rendered,
            Err(e) => {
                log::error!("{e}");
                self.surface.show_text(&notation);
                Outcome::RenderFailed(e)
            }
        };
        self.last_notation = Some(notation);
        outcome
    }

    /// Run the last conversion and render again.
    pub fn retry(&mut self) -> Option<Outcome> {
        let request = self.last_request.take()?;
        Some(self.show(&request.description, request.mode))
    }

    /// Show the last notation, or the raw description when conversion failed.
    /// Returns `false` when there was nothing to show.
    pub fn view_as_text(&mut self) -> bool {
        let text = self
            .last_notation
            .as_deref()
            .or_else(|| self.last_request.as_ref().map(|r| r.description.as_str()))
            .filter(|text| !text.trim().is_empty());

        match text {
            Some(text) => {
                self.surface.show_text(text);
                true
            }
            None => {
                self.surface.show_text(NO_DATA);
                false
            }
        }
    }
}

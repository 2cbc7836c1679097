use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use forecast_core::{DaysAnswer, ForecastQuery, parse_days, parse_flag};
use inquire::{InquireError, Text};
use tracing::{debug, warn};

/// One interactive question. `default` is what an empty answer means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub default: Option<&'static str>,
}

pub const LOCATION: Question = Question { prompt: "Enter location", default: None };

pub const DAYS: Question =
    Question { prompt: "Enter number of forecast days (1-10)", default: Some("1") };

pub const AIR_QUALITY: Question =
    Question { prompt: "Include air quality data? (yes/no)", default: Some("no") };

pub const ALERTS: Question =
    Question { prompt: "Include weather alerts? (yes/no)", default: Some("no") };

/// Source of answers. Answers come back trimmed but otherwise unvalidated.
pub trait Prompter {
    fn ask(&mut self, question: &Question) -> Result<String>;

    /// Show a non-fatal problem with an answer.
    fn warn(&mut self, message: &str) -> Result<()>;
}

/// Plain line-oriented prompter over any reader/writer pair.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &Question) -> Result<String> {
        match question.default {
            Some(default) => write!(self.output, "{} [{default}]: ", question.prompt)?,
            None => write!(self.output, "{}: ", question.prompt)?,
        }
        self.output.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => debug!(prompt = question.prompt, "End of input"),
            Ok(_) => {}
            // Keep whatever was read before the failure.
            Err(err) => warn!(prompt = question.prompt, error = %err, "Failed to read answer"),
        }

        Ok(line.trim().to_string())
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "Warning: {message}")?;
        Ok(())
    }
}

/// Terminal prompter built on `inquire`.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for InquirePrompter {
    fn ask(&mut self, question: &Question) -> Result<String> {
        let mut text = Text::new(question.prompt);
        if let Some(default) = question.default {
            text = text.with_default(default);
        }

        match text.prompt() {
            Ok(answer) => Ok(answer.trim().to_string()),
            // Esc: fall back to the default.
            Err(InquireError::OperationCanceled) => Ok(String::new()),
            Err(InquireError::OperationInterrupted) => bail!("Interrupted"),
            Err(err) => Err(err).context("Failed to read answer from terminal"),
        }
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        println!("Warning: {message}");
        Ok(())
    }
}

/// Ask the four questions in order and build the query.
pub fn collect_query<P: Prompter + ?Sized>(prompter: &mut P) -> Result<ForecastQuery> {
    let location = prompter.ask(&LOCATION)?;
    if location.is_empty() {
        bail!("A location is required");
    }

    // A blank day count still falls back with a warning.
    let DaysAnswer { days, warning } = parse_days(&prompter.ask(&DAYS)?);
    if let Some(message) = warning {
        warn!(%message, "Falling back to default day count");
        prompter.warn(&message)?;
    }

    let air_quality = parse_flag(&answer_or_default(prompter.ask(&AIR_QUALITY)?, &AIR_QUALITY));
    let alerts = parse_flag(&answer_or_default(prompter.ask(&ALERTS)?, &ALERTS));

    Ok(ForecastQuery::new(location)
        .with_days(days)
        .with_air_quality(air_quality)
        .with_alerts(alerts))
}

fn answer_or_default(answer: String, question: &Question) -> String {
    match question.default {
        Some(default) if answer.is_empty() => default.to_string(),
        _ => answer,
    }
}

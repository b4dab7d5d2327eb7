//! Server-side HTML rendering for the analyzer page.
//!
//! The page and the per-headline partial are handlebars templates; every
//! interpolated value is HTML-escaped by the registry.

use chrono::{DateTime, Local};
use handlebars::Handlebars;
use serde::Serialize;

use super::HeadlineReport;
use super::sentiment::SentimentSlot;
use crate::error::AppError;

pub const SAMPLE_HEADLINE: &str =
    "Federal Reserve hints at interest rate cuts, boosting market confidence.";

const PAGE_TEMPLATE: &str = include_str!("templates/page.hbs");
const REPORT_PARTIAL: &str = include_str!("templates/report.hbs");

/// Display category for a sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "POSITIVE" => Tone::Positive,
            "NEGATIVE" => Tone::Negative,
            _ => Tone::Neutral,
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            Tone::Positive => "success",
            Tone::Negative => "error",
            Tone::Neutral => "info",
        }
    }
}

/// A banner shown above the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

/// Everything one page render needs.
#[derive(Debug)]
pub struct PageView<'a> {
    /// Text to pre-fill the textarea with.
    pub input: &'a str,
    pub notice: Option<Notice>,
    pub reports: &'a [HeadlineReport],
    pub analyzed_at: Option<DateTime<Local>>,
}

impl<'a> PageView<'a> {
    /// The initial, empty form.
    pub fn blank() -> Self {
        Self { input: SAMPLE_HEADLINE, notice: None, reports: &[], analyzed_at: None }
    }
}

/// `0.8734` → `"87.34%"`.
pub fn format_confidence(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

// ── Template contexts ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PageContext<'a> {
    input: &'a str,
    notice: Option<NoticeContext<'a>>,
    count: usize,
    analyzed_at: Option<String>,
    reports: Vec<ReportContext<'a>>,
}

#[derive(Serialize)]
struct NoticeContext<'a> {
    class: &'static str,
    message: &'a str,
}

#[derive(Serialize)]
struct ReportContext<'a> {
    number: usize,
    text: &'a str,
    sentiment: Option<SentimentContext<'a>>,
    entities: Vec<EntityGroupContext<'a>>,
}

#[derive(Serialize)]
struct SentimentContext<'a> {
    label: &'a str,
    tone: &'static str,
    percent: u32,
    confidence: String,
    raw_json: String,
}

#[derive(Serialize)]
struct EntityGroupContext<'a> {
    tag: &'a str,
    entries: String,
}

impl<'a> PageContext<'a> {
    fn from_view(view: &'a PageView<'a>) -> Self {
        let notice = view.notice.as_ref().map(|n| match n {
            Notice::Warning(m) => NoticeContext { class: "warning", message: m },
            Notice::Error(m) => NoticeContext { class: "error", message: m },
        });
        Self {
            input: view.input,
            notice,
            count: view.reports.len(),
            analyzed_at: view.analyzed_at.map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string()),
            reports: view.reports.iter().map(ReportContext::from_report).collect(),
        }
    }
}

impl<'a> ReportContext<'a> {
    fn from_report(report: &'a HeadlineReport) -> Self {
        let sentiment = match &report.sentiment {
            SentimentSlot::Available { top, raw } => Some(SentimentContext {
                label: &top.label,
                tone: Tone::from_label(&top.label).css_class(),
                percent: (top.score.clamp(0.0, 1.0) * 100.0).round() as u32,
                confidence: format_confidence(top.score),
                raw_json: serde_json::to_string_pretty(raw)
                    .unwrap_or_else(|e| format!("<serialization failed: {e}>")),
            }),
            SentimentSlot::Unavailable => None,
        };
        Self {
            number: report.headline.position + 1,
            text: &report.headline.text,
            sentiment,
            entities: report
                .entities
                .iter()
                .map(|(tag, entries)| EntityGroupContext { tag, entries: entries.join(", ") })
                .collect(),
        }
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Compiled page templates. Built once per UI server.
pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, AppError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("uppercase", Box::new(uppercase_helper));
        handlebars
            .register_template_string("page", PAGE_TEMPLATE)
            .map_err(|e| AppError::Template(e.to_string()))?;
        handlebars
            .register_partial("report", REPORT_PARTIAL)
            .map_err(|e| AppError::Template(e.to_string()))?;
        Ok(Self { handlebars })
    }

    pub fn render_page(&self, view: &PageView<'_>) -> Result<String, AppError> {
        self.handlebars
            .render("page", &PageContext::from_view(view))
            .map_err(|e| AppError::Template(e.to_string()))
    }
}

// Helper output bypasses the registry's escaping, so escape here.
fn uppercase_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&handlebars::html_escape(&param.to_uppercase()))?;
    Ok(())
}

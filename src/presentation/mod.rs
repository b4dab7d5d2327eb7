//! Presentation layer — browser front-end for the relay.
//!
//! One submission = one batch sentiment call, then one entity call per
//! headline, issued strictly in sequence. Any call failure halts the
//! submission; a short sentiment batch only degrades the affected headlines.

pub mod client;
pub mod entities;
pub mod headlines;
pub mod render;
pub mod sentiment;
mod server;

pub use client::{ClientError, RelayClient};
pub use entities::{GroupedEntities, merge_mentions};
pub use headlines::{Headline, split_headlines};
pub use sentiment::SentimentSlot;
pub use server::UiServer;

use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

/// Everything rendered for one headline.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineReport {
    pub headline: Headline,
    pub sentiment: SentimentSlot,
    pub entities: GroupedEntities,
}

/// Outcome of a submission that did not hit a transport/HTTP failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Nothing but blank lines was submitted; no calls were made.
    Empty,
    Analyzed(Vec<HeadlineReport>),
}

/// Split, dispatch, merge.
pub async fn analyze_submission(client: &RelayClient, input: &str) -> Result<Submission, ClientError> {
    let headlines = split_headlines(input);
    if headlines.is_empty() {
        return Ok(Submission::Empty);
    }

    let span = info_span!("submission", id = %Uuid::new_v4(), headlines = headlines.len());
    analyze_headlines(client, headlines)
        .instrument(span)
        .await
        .map(Submission::Analyzed)
}

async fn analyze_headlines(
    client: &RelayClient,
    headlines: Vec<Headline>,
) -> Result<Vec<HeadlineReport>, ClientError> {
    info!("analyzing submission");
    let slots = sentiment::dispatch_batch(client, &headlines).await?;

    let mut reports = Vec::with_capacity(headlines.len());
    for (headline, sentiment) in headlines.into_iter().zip(slots) {
        let mentions = client.entities(&headline.text).await?;
        debug!(position = headline.position, mentions = mentions.len(), "entities received");
        reports.push(HeadlineReport {
            entities: merge_mentions(&mentions),
            headline,
            sentiment,
        });
    }
    Ok(reports)
}

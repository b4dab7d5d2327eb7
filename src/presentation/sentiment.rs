//! Batch sentiment dispatch and positional alignment.
//!
//! All headlines of one submission go out in a single batch request; result
//! `i` belongs to headline `i`. A short response never shifts results onto
//! the wrong headline: positions past the end are `Unavailable`.

use tracing::{debug, warn};

use super::client::{ClientError, RelayClient};
use super::headlines::{self, Headline};
use crate::inference::types::{SentimentOutput, SentimentScore};

/// Sentiment outcome for one headline.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentSlot {
    Available {
        top: SentimentScore,
        /// Everything the endpoint returned for this position.
        raw: SentimentOutput,
    },
    Unavailable,
}

impl SentimentSlot {
    pub fn top(&self) -> Option<&SentimentScore> {
        match self {
            SentimentSlot::Available { top, .. } => Some(top),
            SentimentSlot::Unavailable => None,
        }
    }
}

/// Pair each headline with the output at its position.
pub fn align(headlines: &[Headline], outputs: &[SentimentOutput]) -> Vec<SentimentSlot> {
    if outputs.len() != headlines.len() {
        warn!(
            headlines = headlines.len(),
            results = outputs.len(),
            "sentiment result count does not match headline count"
        );
    }

    headlines
        .iter()
        .map(|h| match outputs.get(h.position).and_then(|o| o.top().map(|t| (t, o))) {
            Some((top, raw)) => SentimentSlot::Available { top: top.clone(), raw: raw.clone() },
            None => SentimentSlot::Unavailable,
        })
        .collect()
}

/// One batch request for every headline, then positional alignment.
pub async fn dispatch_batch(
    client: &RelayClient,
    headlines: &[Headline],
) -> Result<Vec<SentimentSlot>, ClientError> {
    if headlines.is_empty() {
        return Ok(Vec::new());
    }
    let outputs = client.sentiment_batch(&headlines::texts(headlines), true).await?;
    debug!(headlines = headlines.len(), results = outputs.len(), "batch sentiment received");
    Ok(align(headlines, &outputs))
}

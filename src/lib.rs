//! finsent — financial headline sentiment.
//!
//! Two binaries share this library:
//!
//! - `finsent` runs the [`relay`]: a thin proxy that forwards text to a hosted
//!   sentiment / NER inference endpoint with a bearer credential and relays
//!   the JSON back.
//! - `finsent-ui` runs the [`presentation`] layer: a browser form that splits
//!   input into headlines, calls the relay, merges sub-token entities and
//!   renders one report per headline.

pub mod config;
pub mod error;
pub mod inference;
pub mod logger;
pub mod presentation;
pub mod relay;

//! Proposal extraction from raw model answers.
//!
//! A model answer may embed one transaction proposal as a fenced JSON block:
//!
//! ````text
//! Here is the route via Relay.link.
//!
//! ```json
//! { "type": "SWAP", "summary": "...", "estimatedGas": "...", "feeUsd": 1.23 }
//! ```
//! ````
//!
//! Grammar:
//! - the opening fence is the first "```json" followed by optional spaces or
//!   tabs and a line break (so "```jsonc" never opens a block);
//! - the block closes at the first following "```" that starts a line; the
//!   line break before it (`\n` or `\r\n`) is not part of the body, and
//!   backticks elsewhere in a line never close the block;
//! - an opening fence with no closing fence is not a block.
//!
//! Only the first block is considered. A block that fails to parse or
//! validate leaves the answer untouched and is logged, never surfaced.

use std::ops::Range;

use castagents_types::proposal::{Proposal, ProposalError};

const OPEN_FENCE: &str = "```json";
const CLOSE_FENCE: &str = "\n```";

/// Maximum number of characters of a bad block echoed into the logs.
const PREVIEW_CHARS: usize = 200;

/// Result of splitting a raw answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Text to show the user.
    pub display_text: String,
    pub proposal: Option<Proposal>,
}

/// Location of a fenced block inside an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Byte range of the whole block, fences included.
    pub span: Range<usize>,
    /// Text between the opening line break and the closing fence.
    pub body: &'a str,
}

/// Splits raw model output into display text and an optional proposal.
pub struct ProposalExtractor;

impl ProposalExtractor {
    /// Extract the first embedded proposal from `raw`.
    ///
    /// - no block: display text is `raw` unchanged;
    /// - valid block: the block is removed and the remainder trimmed;
    /// - invalid block: display text is `raw` unchanged, no proposal.
    pub fn extract(raw: &str) -> Extraction {
        let Some(block) = Self::locate(raw) else {
            return Extraction {
                display_text: raw.to_string(),
                proposal: None,
            };
        };

        match Proposal::from_json(block.body) {
            Ok(proposal) => {
                let display_text = format!("{}{}", &raw[..block.span.start], &raw[block.span.end..])
                    .trim()
                    .to_string();
                tracing::debug!(
                    kind = %proposal.kind,
                    fee_usd = proposal.fee_usd,
                    "Extracted transaction proposal"
                );
                Extraction {
                    display_text,
                    proposal: Some(proposal),
                }
            }
            Err(err) => {
                Self::log_malformed(&err, block.body);
                Extraction {
                    display_text: raw.to_string(),
                    proposal: None,
                }
            }
        }
    }

    /// Find the first complete fenced JSON block in `raw`.
    pub fn locate(raw: &str) -> Option<FencedBlock<'_>> {
        let mut search_from = 0;

        while let Some(pos) = raw[search_from..].find(OPEN_FENCE) {
            let start = search_from + pos;
            let after_tag = start + OPEN_FENCE.len();

            if let Some(body_start) = Self::line_break_end(raw, after_tag) {
                // Searching from the opener's own line break lets an empty
                // body close immediately. A missing closing fence means the
                // answer has no usable block at all.
                let newline = body_start - 1;
                let close = newline + raw[newline..].find(CLOSE_FENCE)?;
                let body_end = if close > body_start && raw.as_bytes()[close - 1] == b'\r' {
                    close - 1
                } else {
                    close.max(body_start)
                };
                return Some(FencedBlock {
                    span: start..close + CLOSE_FENCE.len(),
                    body: &raw[body_start..body_end],
                });
            }

            search_from = after_tag;
        }

        None
    }

    /// If `raw[at..]` is optional horizontal whitespace then `\n` or `\r\n`,
    /// return the index just past the line break.
    fn line_break_end(raw: &str, at: usize) -> Option<usize> {
        let rest = &raw[at..];
        let trimmed = rest.trim_start_matches([' ', '\t']);
        let offset = at + (rest.len() - trimmed.len());

        if trimmed.starts_with('\n') {
            Some(offset + 1)
        } else if trimmed.starts_with("\r\n") {
            Some(offset + 2)
        } else {
            None
        }
    }

    fn log_malformed(err: &ProposalError, body: &str) {
        let preview: String = body.chars().take(PREVIEW_CHARS).collect();
        tracing::warn!(
            error = %err,
            content_preview = %preview,
            "Malformed proposal block; showing the answer unchanged"
        );
    }
}

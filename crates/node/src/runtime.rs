// Path: crates/node/src/runtime.rs

//! The round loop: ordered user messages in, framed responses out.
//!
//! The consensus host decides what a round is and which messages are in it;
//! this adapter only promises to apply them in the given order, one at a
//! time to completion, and to report the state digest afterwards for
//! replica cross-checks.

use crate::framing::write_frame;
use serde::Deserialize;
use serde_json::Value;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use xvault_contract::Dispatcher;
use xvault_types::error::VaultError;

/// One user's channel in a round descriptor, by raw fd numbers.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserChannelSpec {
    /// Opaque user identifier (the host's notion, typically a pubkey).
    pub user: String,
    /// Fd carrying the user's raw request bytes; read to EOF.
    pub fd_in: i32,
    /// Fd the response frames are written to.
    pub fd_out: i32,
}

/// One round as described by the consensus host.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoundDescriptor {
    /// The opaque monotonic round key.
    pub round_key: String,
    /// User channels, in processing order.
    pub users: Vec<UserChannelSpec>,
}

/// One in-memory user message, for hosts that deliver bytes directly.
#[derive(Clone, Debug)]
pub struct UserMessage {
    /// Opaque user identifier.
    pub user: String,
    /// The raw request bytes.
    pub raw: Vec<u8>,
}

/// One user's response envelope.
#[derive(Clone, Debug)]
pub struct UserReply {
    /// Opaque user identifier.
    pub user: String,
    /// The response envelope (success or failure).
    pub response: Value,
}

/// The result of one processed round.
#[derive(Clone, Debug)]
pub struct RoundOutcome {
    /// Responses in operation-completion order.
    pub replies: Vec<UserReply>,
    /// The whole-state digest after the round.
    pub state_digest: String,
}

/// Drives the dispatcher for the consensus host.
pub struct RuntimeAdapter {
    dispatcher: Dispatcher,
}

impl RuntimeAdapter {
    /// Wraps a fully wired dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Read access to the dispatcher, for digest hooks.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Processes one round of in-memory messages in order.
    pub async fn process_round(
        &mut self,
        round_key: &str,
        messages: Vec<UserMessage>,
    ) -> Result<RoundOutcome, VaultError> {
        let mut replies = Vec::with_capacity(messages.len());
        for message in messages {
            let response = self.dispatcher.handle_raw(&message.raw, round_key).await;
            replies.push(UserReply {
                user: message.user,
                response,
            });
        }
        let state_digest = self.dispatcher.state_digest()?;
        tracing::info!(
            target: "xvault::runtime",
            round = %round_key,
            replies = replies.len(),
            digest = %state_digest,
            "round processed"
        );
        Ok(RoundOutcome {
            replies,
            state_digest,
        })
    }

    /// Processes one user channel: read the raw request to EOF, handle it,
    /// write the response as one frame.
    pub async fn process_user_channel<R, W>(
        &mut self,
        round_key: &str,
        user: &str,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut raw = Vec::new();
        input.read_to_end(&mut raw).await?;
        if raw.is_empty() {
            tracing::debug!(target: "xvault::runtime", user = %user, "empty input, no response");
            return Ok(());
        }
        let response = self.dispatcher.handle_raw(&raw, round_key).await;
        write_frame(output, &response).await
    }
}

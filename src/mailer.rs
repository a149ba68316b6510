// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Delivery dispatcher.
//!
//! Formats an admitted submission into an outbound email and hands it to
//! the configured SMTP relay. One attempt per submission, bounded by the
//! configured timeout. Every failure cause collapses to one uniform
//! outcome at the HTTP layer; the specific cause is only logged.

use crate::config::MailConfig;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

/// Incoming contact-form data. Fields are forwarded as-is; no format
/// validation beyond presence.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Delivery failure causes.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("could not reach relay {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("relay refused credentials: {0}")]
    AuthRefused(String),

    #[error("unexpected reply to {command}: {reply}")]
    UnexpectedReply {
        command: &'static str,
        reply: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outbound message derived from a submission: envelope plus serialized
/// headers and body.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub envelope_from: String,
    pub envelope_to: String,
    pub data: String,
}

/// Delivery dispatcher. Credentials and relay coordinates are injected at
/// construction.
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    /// Create a new dispatcher with the given mail configuration.
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Format and deliver one submission. A single attempt is made; no
    /// retry.
    pub async fn dispatch(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError> {
        let message = self.compose(payload);
        let timeout = self.config.timeout();
        match tokio::time::timeout(timeout, self.submit(&message)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(timeout)),
        }
    }

    /// Build the outbound message. The visible `From:` and `Reply-To:`
    /// are the submitter's address, the destination is the owner's
    /// mailbox, and the subject line embeds the user's subject.
    pub fn compose(&self, payload: &SubmissionPayload) -> OutboundMessage {
        let body = format!(
            "<div>\r\n\
             <h2>New message via portfolio contact form</h2>\r\n\
             <p><strong>Name:</strong> {name}</p>\r\n\
             <p><strong>Email:</strong> {email}</p>\r\n\
             <p><strong>Subject:</strong> {subject}</p>\r\n\
             <blockquote style=\"white-space: pre-wrap;\">{message}</blockquote>\r\n\
             </div>",
            name = payload.name,
            email = payload.email,
            subject = payload.subject,
            message = payload.message,
        );

        let data = format!(
            "From: {from}\r\n\
             Reply-To: {from}\r\n\
             To: {to}\r\n\
             Subject: Portfolio Contact: {subject}\r\n\
             Date: {date}\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: text/html; charset=utf-8\r\n\
             \r\n\
             {body}",
            from = payload.email,
            to = self.config.owner_mailbox,
            subject = payload.subject,
            date = Utc::now().to_rfc2822(),
            body = body,
        );

        OutboundMessage {
            envelope_from: payload.email.clone(),
            envelope_to: self.config.owner_mailbox.clone(),
            data,
        }
    }

    /// Run the SMTP submission exchange against the relay.
    async fn submit(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let addr = self.config.relay_addr();
        let mut stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| DeliveryError::Connect {
                addr: addr.clone(),
                source,
            })?;
        let (reader, mut writer) = stream.split();
        let mut reader = BufReader::new(reader);

        expect_reply(&mut reader, "220", "greeting").await?;

        writer
            .write_all(format!("EHLO {}\r\n", self.config.helo_name).as_bytes())
            .await?;
        expect_reply(&mut reader, "250", "EHLO").await?;

        if !self.config.account.is_empty() {
            let token = general_purpose::STANDARD.encode(format!(
                "\0{}\0{}",
                self.config.account, self.config.credential
            ));
            writer
                .write_all(format!("AUTH PLAIN {}\r\n", token).as_bytes())
                .await?;
            let reply = read_reply(&mut reader).await?;
            if !reply.starts_with("235") {
                return Err(DeliveryError::AuthRefused(reply));
            }
        }

        writer
            .write_all(format!("MAIL FROM:<{}>\r\n", message.envelope_from).as_bytes())
            .await?;
        expect_reply(&mut reader, "250", "MAIL FROM").await?;

        writer
            .write_all(format!("RCPT TO:<{}>\r\n", message.envelope_to).as_bytes())
            .await?;
        expect_reply(&mut reader, "250", "RCPT TO").await?;

        writer.write_all(b"DATA\r\n").await?;
        expect_reply(&mut reader, "354", "DATA").await?;

        writer.write_all(&dot_stuff(&message.data)).await?;
        writer.write_all(b".\r\n").await?;
        expect_reply(&mut reader, "250", "message body").await?;

        writer.write_all(b"QUIT\r\n").await?;
        debug!(to = %message.envelope_to, "message accepted by relay");
        Ok(())
    }
}

/// Read one SMTP reply, consuming `250-`-style continuation lines.
async fn read_reply<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<String, DeliveryError> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(DeliveryError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "relay closed the connection",
            )));
        }
        // A dash after the code marks a continuation line.
        if line.len() < 4 || line.as_bytes()[3] != b'-' {
            return Ok(line.trim_end().to_string());
        }
    }
}

async fn expect_reply<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    code: &str,
    command: &'static str,
) -> Result<(), DeliveryError> {
    let reply = read_reply(reader).await?;
    if reply.starts_with(code) {
        Ok(())
    } else {
        Err(DeliveryError::UnexpectedReply { command, reply })
    }
}

/// Escape leading dots and normalize line endings to CRLF for the DATA
/// phase.
fn dot_stuff(data: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 16);
    for line in data.lines() {
        if line.starts_with('.') {
            out.push(b'.');
        }
        out.extend_from_slice(line.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

//! Lotus Gateway - LINE messaging webhook gateway for Gemini-backed chat
//!
//! This library bridges LINE chat events to the Gemini generation API,
//! holding short-lived per-user image and conversation context in
//! memory:
//! - Webhook event types and the LINE channel adapter
//! - Reply strategy selection and dispatch
//! - TTL-based per-user context cache
//! - Gemini generation client (text, multimodal, chat)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  LINE Platform                       │
//! │        webhook delivery  │  reply / media API       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Lotus Gateway                        │
//! │   Webhook  │  Dispatcher  │  Context Cache          │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              Gemini (generateContent)                │
//! │   text-only  │  multimodal  │  multi-turn chat      │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cache;
pub mod channels;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod providers;

pub use cache::{ChatTurn, ContextCache, Role};
pub use channels::{Event, LineClient, Messenger, ReplySegment, WebhookDelivery};
pub use config::Config;
pub use dispatch::{Dispatcher, IgnoreReason, ReplyAction, select_action};
pub use error::{Error, Result};
pub use providers::{GeminiClient, Generator};

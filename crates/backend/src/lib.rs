//! HTTP client for the HR assistant backend.
//!
//! Covers the three endpoints the desktop client relies on: credential
//! exchange, file upload and chat, plus incremental decoding of streamed
//! chat bodies.

pub mod api;
pub mod client;
pub mod decoder;
pub mod error;
pub mod wire;

pub use api::{ByteStream, ChatApi, ChatReply, FileUpload};
pub use client::BackendClient;
pub use decoder::{decode_text_stream, Utf8StreamDecoder};
pub use error::{ChatError, Result};
pub use wire::{ChatResult, UploadReceipt};

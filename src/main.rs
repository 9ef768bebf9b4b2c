//! # trackshelf
//!
//! A small self-hosted catalog site for audio tracks.
//!
//! Tracks live on disk, one directory each under the data directory, and are
//! read into an in-memory catalog at startup. The site lists them, serves a
//! detail page per track, streams each track's audio and cover image, and
//! lets the admin add tracks behind HTTP Basic Authentication.
//!
//! Configuration comes from `config.json` (see [`config::Settings`]).

use std::process::ExitCode;

mod auth;
mod config;
mod library;
mod runtime;
mod server;
mod view;

#[tokio::main]
async fn main() -> ExitCode {
    runtime::run().await
}

//! Caller identity resolution for Quizpot.
//!
//! Quizpot doesn't implement authentication itself — that belongs to
//! whatever fronts the service (a gateway, an auth provider, a test
//! harness). This crate defines the [`IdentityProvider`] trait: a
//! single async method that turns an opaque token into a [`UserId`].
//! The service layer calls it once per request and passes the resolved
//! id into the room layer, which never sees tokens at all.
//!
//! Two small implementations ship with the crate:
//!
//! - [`Passthrough`] — the token *is* the user id. For demos and tests.
//! - [`TokenMap`] — a fixed token → user table. For integration tests
//!   that need distinct, misbehaving, or unknown callers.

#![allow(async_fn_in_trait)]

mod error;
mod provider;

pub use error::IdentityError;
pub use provider::{IdentityProvider, Passthrough, TokenMap};

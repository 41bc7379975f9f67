/*
 * cancellation.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Cancellation of superseded rebuilds.
 */

//! Cancellation for in-flight builds.
//!
//! A rebuild overtaken by a newer source change is cancelled. Compile
//! workers poll the token between units; once it fires, their results are
//! discarded rather than registered, so a stale dependency set never
//! replaces a fresher one.

use tokio_util::sync::CancellationToken;

/// Shared between the watch loop and the build it started; clones share state.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    token: CancellationToken,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token cancelled together with `self`, but which can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Mark the build superseded. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::explorer_source::ExplorerError;
use thiserror::Error;

/// Failure kinds of the transaction pipeline and the favorites store.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input is missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The explorer failed, answered with a non-OK envelope or sent data we could not decode.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The explorer answered successfully but carried no payload.
    #[error("not found: {0}")]
    NotFound(String),

    /// Reading or writing the local address book failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<ExplorerError> for Error {
    fn from(err: ExplorerError) -> Self {
        Error::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the core library.

use thiserror::Error;

/// Failure of a single Gmail API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The session could not produce an access token.
    #[error("Authorization error: {0}")]
    Auth(#[from] purgemail_oauth::Error),

    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request URL could not be built.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-success status.
    #[error("Gmail API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the API error envelope, or the raw body.
        message: String,
    },
}

/// Errors that end a purge run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Obtaining an authenticated session failed.
    #[error("Authorization failed: {0}")]
    Authorization(#[from] purgemail_oauth::Error),

    /// A listing call failed; nothing was deleted.
    #[error("Listing messages failed: {0}")]
    Listing(#[source] ApiError),

    /// A delete call failed part way through the run.
    ///
    /// Chunks deleted before the failure stay deleted.
    #[error(
        "Deleting messages failed after {deleted} of {total} messages \
         ({chunks_done} of {chunks_total} chunks) were deleted: {source}"
    )]
    Deletion {
        /// Messages deleted before the failure.
        deleted: usize,
        /// Messages the run set out to delete.
        total: usize,
        /// Chunks deleted before the failure.
        chunks_done: usize,
        /// Chunks in the run.
        chunks_total: usize,
        /// The failed call.
        #[source]
        source: ApiError,
    },
}

impl Error {
    /// Classifies a failed listing call; a token that could not be
    /// refreshed is an authorization failure, not a listing one.
    pub(crate) fn listing(source: ApiError) -> Self {
        match source {
            ApiError::Auth(e) => Self::Authorization(e),
            other => Self::Listing(other),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

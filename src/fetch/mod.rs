//! Network access for the auditor
//!
//! All HTTP traffic goes through [`ResilientFetcher`], which adds bounded
//! retries on top of a pluggable [`Transport`].

mod fetcher;
mod retry;
mod transport;

pub use fetcher::{FetchError, FetchOutcome, FetchResult, ResilientFetcher};
pub use retry::{Pause, RetryPolicy, TokioPause};
pub use transport::{
    build_http_client, HttpTransport, Method, RawResponse, Transport, TransportError,
};

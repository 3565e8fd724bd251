use serde::{Deserialize, Serialize};

/// Identifies one asynchronous request issued by [`RequestTokens`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(u64);

/// Monotonic request generation counter.
///
/// Issue a token when starting work that may complete after being
/// superseded (a details lookup, an image fetch). When the work finishes,
/// keep its result only if the token is still the latest one.
#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: u64,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier token.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// `Some(result)` if `token` is still current, `None` if stale.
    pub fn accept<T>(&self, token: RequestToken, result: T) -> Option<T> {
        self.is_latest(token).then_some(result)
    }
}

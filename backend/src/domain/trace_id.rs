//! Correlation identifier for one inbound request.
//!
//! The [`Trace`](crate::Trace) middleware opens a task-local scope per
//! request; anything running inside it (ledger services logging outcomes,
//! [`Error`](super::Error) constructors) reads the id back through
//! [`TraceId::current`]. Spawned tasks start outside the scope and must be
//! wrapped in [`TraceId::scope`] to keep the id.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Random per-request identifier rendered as a hyphenated UUID.
///
/// # Examples
/// ```
/// use bazaar::TraceId;
///
/// fn log_outcome() {
///     let id = TraceId::current();
///     tracing::info!(trace_id = ?id.map(|id| id.to_string()), "transfer settled");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use bazaar::TraceId;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), uuid::Error> {
    /// let id: TraceId = "0b5f3c1e-2d4a-4c6b-9e8f-7a1b2c3d4e5f".parse()?;
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn scope_exposes_the_id_only_inside() {
        let id = TraceId::generate();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn nested_scopes_shadow_the_outer_id() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let seen = TraceId::scope(outer, async move {
            let nested = TraceId::scope(inner, async { TraceId::current() }).await;
            (nested, TraceId::current())
        })
        .await;
        assert_eq!(seen, (Some(inner), Some(outer)));
    }

    #[rstest]
    #[case("0b5f3c1e-2d4a-4c6b-9e8f-7a1b2c3d4e5f", true)]
    #[case("not-a-trace-id", false)]
    #[case("", false)]
    fn parsing_accepts_only_uuids(#[case] raw: &str, #[case] valid: bool) {
        let parsed = raw.parse::<TraceId>();
        assert_eq!(parsed.is_ok(), valid);
        if let Ok(id) = parsed {
            assert_eq!(id.to_string(), raw);
        }
    }
}

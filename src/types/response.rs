//! Response envelopes for the pipeline operations
//!
//! Each operation produces a flat record carrying an `ok` flag plus either
//! its payload fields or an `error` message. Rejections (bad input, empty
//! index) become `ok:false` envelopes; collaborator faults stay `Err` for
//! the boundary layer to handle.

use serde::Serialize;

use crate::error::Result;
use crate::retrieval::RetrievedItem;

/// Generic response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Whether the operation succeeded
    pub ok: bool,
    /// Payload fields, flattened into the envelope on success;
    /// `None` contributes nothing to the serialized record
    #[serde(flatten)]
    pub payload: Option<T>,
    /// Human-readable failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful envelope wrapping a payload.
    pub fn success(payload: T) -> Self {
        Self {
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    /// Failed envelope with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            error: Some(message.into()),
        }
    }

    /// Convert an operation result into an envelope.
    ///
    /// Rejections become `ok:false` envelopes; any other error is a fault
    /// and propagates unchanged.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(payload) => Ok(Self::success(payload)),
            Err(e) if e.is_rejection() => Ok(Self::failure(e.to_string())),
            Err(e) => Err(e),
        }
    }
}

/// Payload of a successful train run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    /// Collection that was (re)indexed
    pub collection: String,
    /// Number of distinct source files ingested
    pub documents: usize,
    /// Number of chunks indexed
    pub chunks: usize,
    /// Embedding model used
    pub embed_model: String,
}

/// Payload of a successful search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// The trimmed query that was embedded
    pub query: String,
    /// Ranked retrieval results, best first
    pub results: Vec<RetrievedItem>,
}

/// Payload of a successful answer synthesis.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerReport {
    /// The original query
    pub query: String,
    /// The model's grounded answer, trimmed
    pub answer: String,
    /// Retrieval results the answer was grounded on
    pub results: Vec<RetrievedItem>,
    /// Chat model used
    pub chat_model: String,
    /// Embedding model used
    pub embed_model: String,
}

/// Payload of a status query.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Collection name
    pub collection: String,
    /// Current chunk count
    pub chunks: usize,
}

/// Shorthand for converting a result to an envelope (see
/// [`Envelope::from_result`]).
pub fn envelope<T: Serialize>(result: Result<T>) -> Result<Envelope<T>> {
    Envelope::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_success_envelope_flattens_payload() {
        let envelope = Envelope::success(StatusReport {
            collection: "kb".to_string(),
            chunks: 7,
        });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["collection"], "kb");
        assert_eq!(json["chunks"], 7);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope_carries_message() {
        let envelope: Envelope<StatusReport> = Envelope::failure("query is empty");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "query is empty");
        assert!(json.get("collection").is_none());
    }

    #[test]
    fn test_rejections_become_envelopes_faults_propagate() {
        let rejected: Result<StatusReport> = Err(Error::EmptyQuery);
        let envelope = Envelope::from_result(rejected).unwrap();
        assert!(!envelope.ok);

        let fault: Result<StatusReport> = Err(Error::VectorDb("disk full".to_string()));
        assert!(Envelope::from_result(fault).is_err());
    }
}

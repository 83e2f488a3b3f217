use identify_core::ErrorCode;
use serde_json::Value;

use crate::error::EngineError;

/// A classified engine reply.
///
/// The engine signals success and failure by shape: a structured
/// object is a success payload, a string is an error report, a bare
/// boolean acknowledges (or declines) an initialization call. That
/// classification happens here, once, so the rest of the wrapper works
/// with a tagged result instead of inspecting runtime shapes.
#[derive(Debug)]
pub enum EngineReply {
    /// Boolean acknowledgement from an initialization entrypoint.
    Ack(bool),
    /// Structured success payload, still wire-encoded.
    Payload(Value),
    /// An error report. `code` is present when the message carried a
    /// structured prefix such as `E1008:`; uncoded reports (the
    /// engine's bare `"Error..."` strings) leave it empty.
    Fault {
        code: Option<ErrorCode>,
        message: String,
    },
}

impl EngineReply {
    /// Classify a raw engine value. Strings are the engine's error
    /// channel, so every string classifies as a fault. Any other shape
    /// than object/string/bool is a protocol violation.
    pub fn classify(raw: Value) -> Result<Self, EngineError> {
        match raw {
            Value::Bool(ack) => Ok(EngineReply::Ack(ack)),
            Value::Object(_) => Ok(EngineReply::Payload(raw)),
            Value::String(message) => {
                let code = ErrorCode::split_prefix(&message).map(|(code, _)| code);
                Ok(EngineReply::Fault { code, message })
            }
            other => Err(EngineError::Protocol(format!(
                "unexpected reply shape: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_is_payload() {
        let reply = EngineReply::classify(json!({ "proof": "aa" })).unwrap();
        assert!(matches!(reply, EngineReply::Payload(_)));
    }

    #[test]
    fn test_coded_string_is_fault_with_code() {
        let reply = EngineReply::classify(json!("E1008: no witness")).unwrap();
        match reply {
            EngineReply::Fault { code, message } => {
                assert_eq!(code, ErrorCode::parse("E1008"));
                assert_eq!(message, "E1008: no witness");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_uncoded_string_is_fault_without_code() {
        let reply = EngineReply::classify(json!("Error: prover not initialized")).unwrap();
        match reply {
            EngineReply::Fault { code, .. } => assert!(code.is_none()),
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_bool_is_ack() {
        assert!(matches!(
            EngineReply::classify(json!(true)).unwrap(),
            EngineReply::Ack(true)
        ));
        assert!(matches!(
            EngineReply::classify(json!(false)).unwrap(),
            EngineReply::Ack(false)
        ));
    }

    #[test]
    fn test_other_shapes_are_protocol_violations() {
        for raw in [json!(42), json!([1, 2]), json!(null)] {
            assert!(matches!(
                EngineReply::classify(raw).unwrap_err(),
                EngineError::Protocol(_)
            ));
        }
    }
}

//! JSON message broker for page → host messages.
//!
//! Pages post `window.chrome.webview.postMessage({message, args})`. The
//! ipc handler parses payloads here and queues them for the UI thread;
//! malformed or unknown messages are dropped, never surfaced as errors.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerMessage {
    Navigate { uri: String },
    OpenDevTools,
    ToggleDevToolsDock,
}

#[derive(Deserialize)]
struct Envelope {
    message: String,
    #[serde(default)]
    args: serde_json::Value,
}

pub fn parse(raw: &str) -> Option<BrokerMessage> {
    let envelope: Envelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::debug!("unparseable web message: {e}");
            return None;
        }
    };
    match envelope.message.as_str() {
        "navigate" => {
            let uri = envelope.args.get("uri")?.as_str()?.to_string();
            Some(BrokerMessage::Navigate { uri })
        }
        "openDevTools" => Some(BrokerMessage::OpenDevTools),
        "toggleDevToolsDock" => Some(BrokerMessage::ToggleDevToolsDock),
        other => {
            log::debug!("unknown web message kind: {other}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigate() {
        let msg = parse(r#"{"message":"navigate","args":{"uri":"https://example.com"}}"#);
        assert_eq!(
            msg,
            Some(BrokerMessage::Navigate {
                uri: "https://example.com".to_string()
            })
        );
    }

    #[test]
    fn test_parse_kinds_without_args() {
        assert_eq!(
            parse(r#"{"message":"openDevTools"}"#),
            Some(BrokerMessage::OpenDevTools)
        );
        assert_eq!(
            parse(r#"{"message":"toggleDevToolsDock"}"#),
            Some(BrokerMessage::ToggleDevToolsDock)
        );
    }

    #[test]
    fn test_navigate_without_uri_is_dropped() {
        assert_eq!(parse(r#"{"message":"navigate","args":{}}"#), None);
        assert_eq!(parse(r#"{"message":"navigate","args":{"uri":42}}"#), None);
    }

    #[test]
    fn test_unknown_and_malformed_are_dropped() {
        assert_eq!(parse(r#"{"message":"minimize"}"#), None);
        assert_eq!(parse("not json"), None);
        assert_eq!(parse(r#"{"args":{}}"#), None);
    }
}

//! Snapshot encoding
//!
//! The broadcast payload is the full location map, encoded once per pass and
//! shared by every recipient.

use axum::extract::ws::Message;

use crate::protocol::location::LocationSnapshot;

/// Encode the full location map as a JSON object keyed by client identifier.
pub fn encode_snapshot(snapshot: &LocationSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

/// Build the text frame sent to every client for one broadcast pass.
pub fn snapshot_message(snapshot: &LocationSnapshot) -> Result<Message, serde_json::Error> {
    encode_snapshot(snapshot).map(|json| Message::Text(json.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Location;

    #[test]
    fn snapshot_is_keyed_by_client_id() {
        let mut snapshot = LocationSnapshot::new();
        snapshot.insert(
            "1.2.3.4:5000".to_string(),
            Location {
                lat: 10.0,
                lng: 20.0,
                status: "ok".into(),
                name: "A".into(),
                initials: "AA".into(),
            },
        );

        let json: serde_json::Value =
            serde_json::from_str(&encode_snapshot(&snapshot).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "1.2.3.4:5000": {"lat":10.0,"lng":20.0,"status":"ok","name":"A","initials":"AA"}
            })
        );
    }

    #[test]
    fn empty_snapshot_is_empty_object() {
        assert_eq!(encode_snapshot(&LocationSnapshot::new()).unwrap(), "{}");
    }

    #[test]
    fn non_finite_coordinates_encode_as_null() {
        let mut snapshot = LocationSnapshot::new();
        snapshot.insert(
            "a".to_string(),
            Location {
                lat: f64::NAN,
                ..Location::default()
            },
        );
        let json: serde_json::Value =
            serde_json::from_str(&encode_snapshot(&snapshot).unwrap()).unwrap();
        assert!(json["a"]["lat"].is_null());
    }
}

use serde::{Deserialize, Serialize};

use crate::repos::player_stats::PlayerStat;
use crate::repos::scores::Score;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Scores,
    PlayerStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello { protocol: i32 },
    Subscribe { topic: Topic },
    Unsubscribe { topic: Topic },
}

/// Rows carried by a snapshot, serialized as a plain JSON array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SnapshotItems<'a> {
    Scores(&'a [Score]),
    PlayerStats(&'a [PlayerStat]),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg<'a> {
    HelloAck {
        protocol: i32,
    },
    Ack {
        message: &'static str,
        topic: Topic,
    },
    /// Full current result set for `topic`.
    Snapshot {
        topic: Topic,
        version: u64,
        items: SnapshotItems<'a>,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadProtocol,
    BadRequest,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn client_messages_parse() {
        let msg: ClientMsg =
            serde_json::from_value(json!({"type": "subscribe", "topic": "player_stats"})).unwrap();
        assert!(matches!(
            msg,
            ClientMsg::Subscribe {
                topic: Topic::PlayerStats
            }
        ));
        assert!(serde_json::from_value::<ClientMsg>(json!({"type": "subscribe", "topic": "totals"})).is_err());
    }

    #[test]
    fn snapshot_serializes_items_as_array() {
        let msg = ServerMsg::Snapshot {
            topic: Topic::Scores,
            version: 4,
            items: SnapshotItems::Scores(&[]),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "snapshot", "topic": "scores", "version": 4, "items": []})
        );
    }
}

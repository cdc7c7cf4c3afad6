use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kinds::{ComponentKind, ComponentStatus};
use crate::model::WorkloadStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadMessage {
    pub workload_id: Uuid,
    pub manifest: String,
    pub user_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteWorkloadMessage {
    pub workload_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadStatusMessage {
    pub workload_id: Uuid,
    pub status: WorkloadStatus,
    pub status_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadComponentStatusMessage {
    pub workload_id: Uuid,
    pub component_id: Uuid,
    pub kind: ComponentKind,
    pub api_version: String,
    pub name: String,
    pub status: ComponentStatus,
    pub status_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoDiscoveredWorkloadComponentMessage {
    pub workload_id: Uuid,
    pub component_id: Uuid,
    pub project_id: Uuid,
    pub kind: ComponentKind,
    pub api_version: String,
    pub name: String,
    pub submitter: Option<String>,
}

/// Tagged union over the five wire message variants (spec §6), with a
/// total pattern match at every consumer and a decoder that rejects
/// unknown tags instead of silently dropping them (spec §9's reshaping
/// note on message dispatch).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum BusMessage {
    Workload(WorkloadMessage),
    DeleteWorkload(DeleteWorkloadMessage),
    WorkloadStatus(WorkloadStatusMessage),
    WorkloadComponentStatusUpdate(WorkloadComponentStatusMessage),
    AutoDiscoveredWorkloadComponent(AutoDiscoveredWorkloadComponentMessage),
}

impl BusMessage {
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("BusMessage serialization is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_workload_message() {
        let msg = BusMessage::Workload(WorkloadMessage {
            workload_id: Uuid::nil(),
            manifest: "kind: Deployment".into(),
            user_token: "tok".into(),
        });
        let bytes = msg.encode();
        let decoded = BusMessage::decode(&bytes).unwrap();
        match decoded {
            BusMessage::Workload(w) => assert_eq!(w.manifest, "kind: Deployment"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        let bad = br#"{"message_type":"not_a_real_type"}"#;
        assert!(BusMessage::decode(bad).is_err());
    }
}

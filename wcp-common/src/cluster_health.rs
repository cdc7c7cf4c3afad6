use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterHealth {
    Healthy,
    Verifying,
    Unhealthy,
}

/// spec §5: a cluster is `HEALTHY` if its last heartbeat is within the
/// health window, `VERIFYING` if no heartbeat has ever been received,
/// and `UNHEALTHY` once the window has expired. Submission checks this
/// synchronously (spec §4.2's cluster health gate).
pub fn evaluate(last_heartbeat_at: Option<DateTime<Utc>>, now: DateTime<Utc>, health_window: Duration) -> ClusterHealth {
    match last_heartbeat_at {
        None => ClusterHealth::Verifying,
        Some(hb) if now - hb <= health_window => ClusterHealth::Healthy,
        Some(_) => ClusterHealth::Unhealthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_heartbeat_is_verifying() {
        let now = Utc::now();
        assert_eq!(evaluate(None, now, Duration::seconds(30)), ClusterHealth::Verifying);
    }

    #[test]
    fn recent_heartbeat_is_healthy() {
        let now = Utc::now();
        let hb = now - Duration::seconds(5);
        assert_eq!(evaluate(Some(hb), now, Duration::seconds(30)), ClusterHealth::Healthy);
    }

    #[test]
    fn stale_heartbeat_is_unhealthy() {
        let now = Utc::now();
        let hb = now - Duration::seconds(60);
        assert_eq!(evaluate(Some(hb), now, Duration::seconds(30)), ClusterHealth::Unhealthy);
    }
}

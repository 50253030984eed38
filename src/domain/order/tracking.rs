use chrono::{DateTime, Duration, Utc};

use super::aggregate::Order;
use super::value_objects::{OrderStatus, TrackingEvent, DAYS_PER_STAGE, STATUS_FLOW};

// ============================================================================
// Tracking Event Generator
// ============================================================================
//
// The history is derived, never accumulated: one event per stage reached,
// timestamped `created_at + index * 2 days`. Same inputs, same output.
//
// ============================================================================

/// Tracking history for an order, most recent stage first.
pub fn generate_tracking_events(order: &Order) -> Vec<TrackingEvent> {
    tracking_events_for(&order.id, order.status, order.created_at)
}

/// History for an order id at `status`, created at `created_at`.
pub fn tracking_events_for(
    order_id: &str,
    status: OrderStatus,
    created_at: DateTime<Utc>,
) -> Vec<TrackingEvent> {
    let mut events: Vec<TrackingEvent> = STATUS_FLOW[..=status.index()]
        .iter()
        .map(|&reached| {
            let descriptor = reached.descriptor();
            TrackingEvent {
                id: format!("{}_{}", order_id, reached),
                status: reached,
                title: descriptor.title.to_string(),
                description: descriptor.description.to_string(),
                location: descriptor.location.to_string(),
                timestamp: stage_timestamp(created_at, reached),
            }
        })
        .collect();

    events.reverse();
    events
}

/// When a stage happens on the simulated timeline.
pub fn stage_timestamp(created_at: DateTime<Utc>, status: OrderStatus) -> DateTime<Utc> {
    created_at + Duration::days(status.index() as i64 * DAYS_PER_STAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_length_is_index_plus_one_for_every_status() {
        for status in STATUS_FLOW {
            let events = tracking_events_for("ORD-1-ABCDEF", status, created_at());
            assert_eq!(events.len(), status.index() + 1, "status {}", status);
        }
    }

    #[test]
    fn test_created_has_single_event() {
        let events = tracking_events_for("ORD-1-ABCDEF", OrderStatus::Created, created_at());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "ORD-1-ABCDEF_created");
        assert_eq!(events[0].timestamp, created_at());
        assert_eq!(events[0].title, OrderStatus::Created.descriptor().title);
    }

    #[test]
    fn test_most_recent_first_with_two_day_spacing() {
        let events = tracking_events_for("ORD-1-ABCDEF", OrderStatus::ArrivedLocker, created_at());

        assert_eq!(events.first().unwrap().status, OrderStatus::ArrivedLocker);
        assert_eq!(events.last().unwrap().status, OrderStatus::Created);
        assert_eq!(events[0].timestamp, created_at() + Duration::days(12));
        assert_eq!(events[0].id, "ORD-1-ABCDEF_arrived_locker");
        assert_eq!(events[0].location, "São Paulo, Brazil");

        for pair in events.windows(2) {
            assert_eq!(pair[0].timestamp - pair[1].timestamp, Duration::days(2));
            assert_eq!(pair[0].status.index(), pair[1].status.index() + 1);
        }
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let first = tracking_events_for("ORD-9-ZZZZZZ", OrderStatus::InTransit, created_at());
        let second = tracking_events_for("ORD-9-ZZZZZZ", OrderStatus::InTransit, created_at());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_completed_covers_whole_flow() {
        let events = tracking_events_for("ORD-2-QWERTY", OrderStatus::Completed, created_at());
        assert_eq!(events.len(), 14);
        assert_eq!(events[0].timestamp, created_at() + Duration::days(26));
    }
}

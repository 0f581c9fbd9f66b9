//! Unit tests for pdes-queue.

use pdes_core::{MessageId, SimTime, UnitId, WorkerId};

use crate::{Envelope, Inbox, Message, MessageQueue, Postbox, QueueError, Route};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn msg(origin: u32, seq: u64, target: u32, time: f64) -> Message<&'static str> {
    Message::new(MessageId::new(UnitId(origin), seq), UnitId(target), SimTime(time), "x")
}

fn times(batch: &[Message<&'static str>]) -> Vec<f64> {
    batch.iter().map(|m| m.time().0).collect()
}

// ── Message ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod message {
    use super::*;

    #[test]
    fn equality_is_by_identity() {
        let a = msg(0, 1, 5, 10.0);
        let b = msg(0, 2, 5, 10.0); // same target, time, payload
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn handle_carries_routing_key() {
        let m = msg(3, 7, 9, 42.0);
        let h = m.handle();
        assert_eq!(h.id, MessageId::new(UnitId(3), 7));
        assert_eq!(h.target, UnitId(9));
        assert_eq!(h.time, SimTime(42.0));
    }
}

// ── MessageQueue ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn empty_queue() {
        let mut q: MessageQueue<&str> = MessageQueue::new();
        assert!(q.is_empty());
        assert!(q.peek_next().is_none());
        assert!(q.pop_up_to(SimTime(1e9)).is_empty());
    }

    #[test]
    fn pops_in_time_order() {
        let mut q = MessageQueue::new();
        q.put(msg(0, 0, 0, 30.0));
        q.put(msg(0, 1, 0, 10.0));
        q.put(msg(0, 2, 0, 20.0));
        assert_eq!(q.peek_next().unwrap().time(), SimTime(10.0));
        assert_eq!(times(&q.pop_up_to(SimTime(100.0))), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn equal_times_break_ties_by_id() {
        let mut q = MessageQueue::new();
        q.put(msg(2, 0, 0, 5.0));
        q.put(msg(1, 4, 0, 5.0));
        q.put(msg(1, 3, 0, 5.0));
        let ids: Vec<_> = q.pop_up_to(SimTime(5.0)).iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec![
            MessageId::new(UnitId(1), 3),
            MessageId::new(UnitId(1), 4),
            MessageId::new(UnitId(2), 0),
        ]);
    }

    #[test]
    fn pop_up_to_is_inclusive_and_stops_at_limit() {
        let mut q = MessageQueue::new();
        q.put(msg(0, 0, 0, 5.0));
        q.put(msg(0, 1, 0, 10.0));
        q.put(msg(0, 2, 0, 12.0));
        assert_eq!(times(&q.pop_up_to(SimTime(10.0))), vec![5.0, 10.0]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_time(), Some(SimTime(12.0)));
    }

    #[test]
    fn remove_by_identity() {
        let mut q = MessageQueue::new();
        let a = msg(0, 0, 0, 5.0);
        let b = msg(0, 1, 0, 5.0);
        let (ha, hb) = (a.handle(), b.handle());
        q.put(a);
        q.put(b);
        assert!(q.remove(&ha));
        assert_eq!(q.len(), 1);
        assert_eq!(q.peek_next().unwrap().id(), hb.id);
    }

    #[test]
    fn remove_twice_is_a_noop() {
        let mut q = MessageQueue::new();
        let a = msg(0, 0, 0, 5.0);
        let b = msg(0, 1, 0, 6.0);
        let ha = a.handle();
        q.put(a);
        q.put(b);
        assert!(q.remove(&ha));
        assert!(!q.remove(&ha));
        assert_eq!(q.len(), 1, "second remove must not touch another message");
    }

    #[test]
    fn remove_after_delivery_is_a_noop() {
        let mut q = MessageQueue::new();
        let a = msg(0, 0, 0, 5.0);
        let ha = a.handle();
        q.put(a);
        assert_eq!(q.pop_up_to(SimTime(5.0)).len(), 1);
        assert!(!q.remove(&ha));
    }

    #[test]
    fn merge_applies_deliveries_before_cancels() {
        let mut q = MessageQueue::new();
        let a = msg(0, 0, 0, 5.0);
        let cancel = Envelope::Cancel(a.handle());
        // Cancel posted ahead of the delivery it targets.
        let cancelled = q.merge(vec![cancel, Envelope::Deliver(a), Envelope::Deliver(msg(0, 1, 0, 6.0))]);
        assert_eq!(cancelled, 1);
        assert_eq!(times(&q.pop_up_to(SimTime(10.0))), vec![6.0]);
    }
}

// ── Inbox & Postbox ───────────────────────────────────────────────────────────

#[cfg(test)]
mod inbox {
    use super::*;

    #[test]
    fn parity_slots_are_independent() {
        let inbox = Inbox::new();
        inbox.post(1, Envelope::Deliver(msg(0, 0, 0, 5.0)));
        inbox.post(2, Envelope::Deliver(msg(0, 1, 0, 7.0)));
        inbox.post(2, Envelope::Cancel(msg(0, 9, 0, 1.0).handle()));

        assert_eq!(inbox.pending_deliveries(1), 1);
        assert_eq!(inbox.pending_deliveries(2), 1);
        assert_eq!(inbox.earliest(2), Some(SimTime(7.0)));

        assert_eq!(inbox.take(3).len(), 1, "round 3 shares round 1's slot");
        assert_eq!(inbox.pending_deliveries(1), 0);
        assert_eq!(inbox.take(2).len(), 2);
    }

    #[test]
    fn concurrent_posts_all_land() {
        let inbox = Inbox::new();
        std::thread::scope(|s| {
            for origin in 0..4u32 {
                let inbox = &inbox;
                s.spawn(move || {
                    for seq in 0..250u64 {
                        inbox.post(0, Envelope::Deliver(msg(origin, seq, 0, seq as f64)));
                    }
                });
            }
        });
        assert_eq!(inbox.pending_deliveries(0), 1_000);
    }

    fn two_worker_postbox() -> Postbox<&'static str> {
        let routes = vec![
            Route { worker: WorkerId(0), slot: 0 },
            Route { worker: WorkerId(1), slot: 0 },
            Route::VACANT,
        ];
        Postbox::new(routes, 2)
    }

    #[test]
    fn post_routes_to_owner() {
        let pb = two_worker_postbox();
        pb.post(0, msg(0, 0, 1, 12.0)).unwrap();
        assert_eq!(pb.inbox(WorkerId(0)).pending_deliveries(0), 0);
        assert_eq!(pb.inbox(WorkerId(1)).pending_deliveries(0), 1);
        assert_eq!(pb.pending_deliveries(0), 1);
        assert_eq!(pb.earliest(0), Some(SimTime(12.0)));
    }

    #[test]
    fn unknown_and_vacant_targets_rejected() {
        let pb = two_worker_postbox();
        assert_eq!(pb.post(0, msg(0, 0, 2, 1.0)), Err(QueueError::UnknownUnit(UnitId(2))));
        assert_eq!(pb.route(UnitId(99)), Err(QueueError::UnknownUnit(UnitId(99))));
    }
}

//! Outbound delivery planning.
//!
//! The delivery channel penalises bursts and requires a card carousel to go
//! out as a single call, so consecutive cards are coalesced into one unit
//! and every unit departs one fixed interval after the previous one. The
//! plan is pure data; the gateway executes it on detached timers, which
//! makes the pacing best effort rather than a strict ordering guarantee.

use std::time::Duration;

use crate::reply::{Card, ReplyMessage};

/// Fixed spacing between scheduled units.
pub const SEND_INTERVAL: Duration = Duration::from_millis(1100);

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryUnit {
    /// One carousel call containing a run of consecutive cards.
    Carousel(Vec<Card>),
    /// One individual send.
    Single(ReplyMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledUnit {
    pub delay: Duration,
    pub unit: DeliveryUnit,
}

/// Plans the delivery of an ordered reply list with the default interval.
pub fn plan_delivery(messages: Vec<ReplyMessage>) -> Vec<ScheduledUnit> {
    plan_delivery_with_interval(messages, SEND_INTERVAL)
}

/// Walks the list once: a run of consecutive cards closes when a non-card
/// item or the end of the list is reached, flushing as one carousel unit.
/// The k-th unit (0-indexed, list order) departs at `k * interval`, so
/// delays strictly increase with unit index.
pub fn plan_delivery_with_interval(
    messages: Vec<ReplyMessage>,
    interval: Duration,
) -> Vec<ScheduledUnit> {
    let mut units = Vec::new();
    let mut run: Vec<Card> = Vec::new();

    for message in messages {
        match message {
            ReplyMessage::Card(card) => run.push(card),
            other => {
                if !run.is_empty() {
                    units.push(DeliveryUnit::Carousel(std::mem::take(&mut run)));
                }
                units.push(DeliveryUnit::Single(other));
            }
        }
    }
    if !run.is_empty() {
        units.push(DeliveryUnit::Carousel(run));
    }

    units
        .into_iter()
        .enumerate()
        .map(|(index, unit)| ScheduledUnit {
            delay: interval * index as u32,
            unit,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str) -> ReplyMessage {
        ReplyMessage::Card(Card {
            title: title.into(),
            image_url: None,
            subtitle: None,
            buttons: Vec::new(),
        })
    }

    #[test]
    fn cards_text_card_batches_into_three_units() {
        let plan = plan_delivery(vec![
            card("one"),
            card("two"),
            ReplyMessage::text("between"),
            card("three"),
        ]);

        assert_eq!(plan.len(), 3);
        match &plan[0].unit {
            DeliveryUnit::Carousel(cards) => {
                assert_eq!(cards.len(), 2);
                assert_eq!(cards[0].title, "one");
                assert_eq!(cards[1].title, "two");
            }
            other => panic!("expected leading carousel, got {other:?}"),
        }
        assert_eq!(
            plan[1].unit,
            DeliveryUnit::Single(ReplyMessage::text("between"))
        );
        match &plan[2].unit {
            DeliveryUnit::Carousel(cards) => assert_eq!(cards.len(), 1),
            other => panic!("expected trailing carousel, got {other:?}"),
        }

        // Delays strictly increase with unit index.
        assert_eq!(plan[0].delay, Duration::ZERO);
        assert_eq!(plan[1].delay, SEND_INTERVAL);
        assert_eq!(plan[2].delay, SEND_INTERVAL * 2);
    }

    #[test]
    fn all_cards_coalesce_into_one_immediate_unit() {
        let plan = plan_delivery(vec![card("a"), card("b"), card("c")]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].delay, Duration::ZERO);
        match &plan[0].unit {
            DeliveryUnit::Carousel(cards) => assert_eq!(cards.len(), 3),
            other => panic!("expected carousel, got {other:?}"),
        }
    }

    #[test]
    fn non_cards_schedule_individually_in_order() {
        let plan = plan_delivery_with_interval(
            vec![
                ReplyMessage::text("first"),
                ReplyMessage::Image {
                    url: "https://cdn.example.com/a.png".into(),
                },
                ReplyMessage::text("last"),
            ],
            Duration::from_millis(10),
        );
        assert_eq!(plan.len(), 3);
        for (index, scheduled) in plan.iter().enumerate() {
            assert_eq!(scheduled.delay, Duration::from_millis(10) * index as u32);
        }
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(plan_delivery(Vec::new()).is_empty());
    }
}

use super::TimeWindow;
use crate::config::InvertedIntervalPolicy;
use crate::ir::{ObservationEvent, TimedEvent};
use crate::parser::parse_instant;

/// Events overlapping `window` (touching an edge counts), sorted by start.
/// Events whose instants do not parse are dropped silently.
pub fn filter_in_window(
    events: &[ObservationEvent],
    window: &TimeWindow,
    inverted: InvertedIntervalPolicy,
) -> Vec<TimedEvent> {
    let mut kept: Vec<TimedEvent> = Vec::new();
    let mut unparsed = 0usize;
    let mut inverted_dropped = 0usize;

    for (idx, event) in events.iter().enumerate() {
        let start = event.start.as_deref().and_then(parse_instant);
        let end = event.end.as_deref().and_then(parse_instant);
        let (Some(start), Some(mut end)) = (start, end) else {
            unparsed += 1;
            continue;
        };
        if end < start {
            match inverted {
                InvertedIntervalPolicy::Drop => {
                    inverted_dropped += 1;
                    continue;
                }
                InvertedIntervalPolicy::ZeroWidth => end = start,
            }
        }
        if end >= window.start() && start <= window.end() {
            kept.push(TimedEvent {
                id: event.id.clone(),
                start,
                end,
                status: event.status,
                enabled: event.enabled,
                label: event.label.clone(),
                source_index: idx,
            });
        }
    }

    // Stable: equal starts keep feed order.
    kept.sort_by_key(|event| event.start);

    if unparsed > 0 {
        log::debug!("{unparsed} observations without a usable start/end were skipped");
    }
    if inverted_dropped > 0 {
        log::warn!("{inverted_dropped} observations ending before they start were dropped");
    }
    kept
}

//! Edge case and boundary condition tests for the quadrature decoder

use ec11_decoder::hal::{MockClock, MockEncoder};
use ec11_decoder::{
    Channel, ChannelLevels, DecoderConfig, Ec11Decoder, Ec11Encoder, Edge, EdgeEvent, Step,
    TransitionEvent, WatchPoint,
};

fn decoder(config: DecoderConfig) -> Ec11Decoder {
    Ec11Decoder::new(config).unwrap()
}

/// Feeds `n` clean quarter-steps, 10µs apart, and returns the next timestamp.
fn rotate(decoder: &mut Ec11Decoder, step: Step, n: usize, t0: u64) -> u64 {
    let mut t = t0;
    for _ in 0..n {
        let (channel, next) = decoder.channel_levels().advance(step).unwrap();
        decoder.on_edge(EdgeEvent::new(channel, Edge::towards(next.level(channel)), t));
        t += 10_000;
    }
    t
}

fn drain(decoder: &mut Ec11Decoder) -> Vec<TransitionEvent> {
    let mut events = Vec::new();
    decoder.poll_events_with(|event| events.push(event));
    events
}

// ============================================================================
// Contact Bounce
// ============================================================================

#[test]
fn bounce_inside_filter_window_is_discarded() {
    let mut decoder = decoder(DecoderConfig::default());
    let mut t = 0;

    for _ in 0..20 {
        let (channel, next) = decoder.channel_levels().advance(Step::Forward).unwrap();
        let edge = Edge::towards(next.level(channel));
        let bounce = Edge::towards(!next.level(channel));

        decoder.on_edge(EdgeEvent::new(channel, edge, t));
        decoder.on_edge(EdgeEvent::new(channel, bounce, t + 200));
        decoder.on_edge(EdgeEvent::new(channel, edge, t + 400));
        t += 10_000;
    }

    assert_eq!(decoder.count(), 20);
    // Each quarter-step: the bounce back and the re-settle are both suppressed.
    assert_eq!(decoder.edge_stats().suppressed, 40);
}

#[test]
fn unfiltered_bounce_still_nets_one_step() {
    let mut decoder = decoder(DecoderConfig::default().with_glitch_filter_ns(0));

    decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 0));
    decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Falling, 1));
    decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 2));

    assert_eq!(decoder.count(), 1);
    assert_eq!(decoder.channel_levels(), ChannelLevels::new(false, true));
}

#[test]
fn edge_exactly_at_filter_width_is_accepted() {
    let mut decoder = decoder(DecoderConfig::default().with_glitch_filter_ns(1_000));

    decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 5_000));
    assert_eq!(
        decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Falling, 6_000)),
        Step::Backward
    );
    assert_eq!(decoder.count(), 0);
}

// ============================================================================
// Saturation
// ============================================================================

#[test]
fn low_limit_reports_once() {
    let mut decoder = decoder(DecoderConfig::default().with_limits(-3, 3));

    let t = rotate(&mut decoder, Step::Backward, 10, 0);
    assert_eq!(decoder.count(), -3);

    let events = drain(&mut decoder);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].point, WatchPoint::LowLimit);
    assert_eq!(events[0].count, -3);

    // Pushing further against the bound reports nothing new.
    rotate(&mut decoder, Step::Backward, 4, t);
    assert_eq!(decoder.count(), -3);
    assert!(drain(&mut decoder).is_empty());
}

#[test]
fn extreme_limits() {
    let mut decoder = decoder(
        DecoderConfig::default()
            .with_limits(i32::MAX - 2, i32::MAX)
            .with_initial_count(i32::MAX - 2),
    );
    rotate(&mut decoder, Step::Forward, 5, 0);
    assert_eq!(decoder.count(), i32::MAX);
}

// ============================================================================
// Watch Points
// ============================================================================

#[test]
fn watch_points_fire_in_both_directions() {
    let mut decoder = decoder(
        DecoderConfig::default()
            .with_limits(-10, 10)
            .with_watch_point(5)
            .with_watch_point(-2),
    );

    let t = rotate(&mut decoder, Step::Forward, 7, 0);
    rotate(&mut decoder, Step::Backward, 9, t);
    assert_eq!(decoder.count(), -2);

    let points: Vec<_> = drain(&mut decoder).iter().map(|e| e.point).collect();
    assert_eq!(
        points,
        [
            WatchPoint::Value(5),
            WatchPoint::Value(5),
            WatchPoint::Value(-2),
        ]
    );
}

#[test]
fn watch_point_on_limit_reports_as_limit() {
    let mut decoder = decoder(
        DecoderConfig::default()
            .with_limits(-4, 4)
            .with_watch_point(4),
    );
    rotate(&mut decoder, Step::Forward, 4, 0);

    let events = drain(&mut decoder);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].point, WatchPoint::HighLimit);
    assert_eq!(events[0].watch_value(), 4);
}

#[test]
fn clear_does_not_report() {
    let mut decoder = decoder(
        DecoderConfig::default()
            .with_limits(-4, 4)
            .with_watch_point(0),
    );
    rotate(&mut decoder, Step::Forward, 2, 0);
    decoder.clear_count();
    assert_eq!(decoder.count(), 0);
    assert!(drain(&mut decoder).is_empty());
}

// ============================================================================
// Event Queue Overflow
// ============================================================================

#[test]
fn overflow_keeps_oldest_events() {
    let mut decoder = decoder(DecoderConfig::default().with_limits(-1, 1));

    // 1 + 20 * 2 = 41 limit events
    let mut t = rotate(&mut decoder, Step::Forward, 1, 0);
    for _ in 0..20 {
        t = rotate(&mut decoder, Step::Backward, 2, t);
        t = rotate(&mut decoder, Step::Forward, 2, t);
    }

    assert_eq!(decoder.pending_events(), decoder.event_capacity());
    assert_eq!(decoder.take_dropped_events(), 31);

    let values: Vec<_> = drain(&mut decoder).iter().map(|e| e.watch_value()).collect();
    assert_eq!(values, [1, -1, 1, -1, 1, -1, 1, -1, 1, -1]);
    assert_eq!(decoder.pending_events(), 0);
}

#[test]
fn dropped_count_readable_after_poll() {
    let mut decoder = decoder(DecoderConfig::default().with_limits(-1, 1));

    let mut t = rotate(&mut decoder, Step::Forward, 1, 0);
    for _ in 0..20 {
        t = rotate(&mut decoder, Step::Backward, 2, t);
        t = rotate(&mut decoder, Step::Forward, 2, t);
    }

    assert_eq!(decoder.poll_events(), 10);
    assert_eq!(decoder.dropped_events(), 31);
    assert_eq!(decoder.take_dropped_events(), 31);
    assert_eq!(decoder.take_dropped_events(), 0);
}

#[test]
fn queue_accepts_again_after_drain() {
    let mut decoder = decoder(DecoderConfig::default().with_limits(-1, 1));

    let mut t = rotate(&mut decoder, Step::Forward, 1, 0);
    for _ in 0..10 {
        t = rotate(&mut decoder, Step::Backward, 2, t);
        t = rotate(&mut decoder, Step::Forward, 2, t);
    }
    assert_eq!(decoder.poll_events(), 10);

    rotate(&mut decoder, Step::Backward, 2, t);
    assert_eq!(decoder.pending_events(), 1);
}

// ============================================================================
// Sampled Input
// ============================================================================

#[test]
fn missed_phase_is_not_counted() {
    let clock = MockClock::new();
    let mut encoder: Ec11Encoder<MockEncoder, &MockClock> =
        Ec11Encoder::new(DecoderConfig::default(), MockEncoder::new(), &clock).unwrap();

    encoder.input_mut().turn(Step::Forward);
    clock.advance_us(10);
    assert_eq!(encoder.poll(), Ok(Step::Forward));

    // 01 -> 10: both channels moved between two samples.
    encoder.input_mut().set_levels(ChannelLevels::new(true, false));
    clock.advance_us(10);
    assert_eq!(encoder.poll(), Ok(Step::Hold));
    assert_eq!(encoder.count(), 1);
    assert_eq!(encoder.decoder().edge_stats().skipped, 1);

    // Decoding resumes from the new levels.
    encoder.input_mut().turn(Step::Forward);
    clock.advance_us(10);
    assert_eq!(encoder.poll(), Ok(Step::Forward));
    assert_eq!(encoder.count(), 2);
}

#[test]
fn fast_sampling_of_slow_knob_counts_once() {
    let clock = MockClock::new();
    let mut encoder: Ec11Encoder<MockEncoder, &MockClock> =
        Ec11Encoder::new(DecoderConfig::default(), MockEncoder::new(), &clock).unwrap();

    for _ in 0..8 {
        encoder.input_mut().turn(Step::Backward);
        for _ in 0..5 {
            clock.advance_us(100);
            encoder.poll().unwrap();
        }
    }
    assert_eq!(encoder.count(), -8);
}

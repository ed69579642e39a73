//! Edge path and application running on separate threads

use ec11_decoder::{DecoderConfig, Ec11Decoder, Edge, EdgeEvent, EdgeInput, Step};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

fn feed(edges: &mut EdgeInput<'_, 11>, steps: &[Step]) {
    for (i, &step) in steps.iter().enumerate() {
        let (channel, next) = edges.channel_levels().advance(step).unwrap();
        edges.on_edge(EdgeEvent::new(
            channel,
            Edge::towards(next.level(channel)),
            i as u64 * 10_000,
        ));
    }
}

fn script(len: usize) -> Vec<Step> {
    let mut state = 0x1234_5678u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 3 == 0 {
                Step::Backward
            } else {
                Step::Forward
            }
        })
        .collect()
}

#[test]
fn concurrent_reads_stay_within_limits() {
    let steps = script(20_000);
    let expected = steps
        .iter()
        .fold(0i32, |acc, step| (acc + step.as_i32()).max(-50).min(50));

    let mut decoder: Ec11Decoder =
        Ec11Decoder::new(DecoderConfig::default().with_limits(-50, 50)).unwrap();
    let done = AtomicBool::new(false);
    let (mut edges, mut app) = decoder.split();

    let mut values = Vec::new();
    thread::scope(|s| {
        s.spawn(|| {
            feed(&mut edges, &steps);
            done.store(true, Ordering::Release);
        });

        while !done.load(Ordering::Acquire) {
            let count = app.count();
            assert!((-50..=50).contains(&count));
            app.poll_events_with(|event| values.push(event.watch_value()));
            thread::yield_now();
        }
    });
    app.poll_events_with(|event| values.push(event.watch_value()));

    assert_eq!(app.count(), expected);
    assert!(values.iter().all(|&v| v == -50 || v == 50));
    drop(edges);
    drop(app);
    assert_eq!(decoder.count(), expected);
}

#[test]
fn clear_while_turning_stays_within_limits() {
    let steps = vec![Step::Forward; 5_000];
    let mut decoder: Ec11Decoder =
        Ec11Decoder::new(DecoderConfig::default().with_limits(-100, 100)).unwrap();
    let done = AtomicBool::new(false);
    let (mut edges, app) = decoder.split();

    thread::scope(|s| {
        s.spawn(|| {
            feed(&mut edges, &steps);
            done.store(true, Ordering::Release);
        });

        while !done.load(Ordering::Acquire) {
            app.clear_count();
            let count = app.count();
            assert!((-100..=100).contains(&count));
        }
    });

    app.clear_count();
    assert_eq!(app.count(), 0);
}

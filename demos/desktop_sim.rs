//! Desktop simulation of an EC11 knob.
//!
//! Runs the decoder's two contexts on two threads without hardware:
//! - A sampler thread turns a simulated knob and polls its levels
//! - The main thread drains watch-point events into a callback
//!
//! # Usage
//!
//! ```sh
//! RUST_LOG=debug cargo run --example desktop_sim
//! ```

use ec11_decoder::hal::MockEncoder;
use ec11_decoder::{
    Clock, DecoderConfig, Ec11Encoder, EncoderSampler, Step, DEFAULT_EVENT_SLOTS,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Time between simulated quarter-steps
const STEP_INTERVAL: Duration = Duration::from_micros(200);

/// Monotonic desktop clock.
struct SystemClock(Instant);

impl Clock for SystemClock {
    fn now_ns(&self) -> u64 {
        self.0.elapsed().as_nanos() as u64
    }
}

/// Knob movements: (direction, quarter-steps)
const SCRIPT: &[(Step, usize)] = &[
    (Step::Forward, 30),
    (Step::Backward, 50),
    (Step::Forward, 10),
];

fn run_script(
    sampler: &mut EncoderSampler<'_, MockEncoder, SystemClock, DEFAULT_EVENT_SLOTS>,
) -> anyhow::Result<()> {
    for &(step, n) in SCRIPT {
        for _ in 0..n {
            sampler.input_mut().turn(step);
            sampler.poll()?;
            thread::sleep(STEP_INTERVAL);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ec11_decoder=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=================================");
    println!("  EC11 Decoder Desktop Simulator");
    println!("=================================");
    println!();

    let config = DecoderConfig::default()
        .with_limits(-24, 24)
        .with_watch_point(0)
        .with_watch_point(12);

    let mut encoder =
        Ec11Encoder::<_, _>::new(config, MockEncoder::new(), SystemClock(Instant::now()))?;
    encoder.register_event_callback(|value| println!("[EVENT] count reached {}", value));

    let done = AtomicBool::new(false);
    let (mut sampler, mut app) = encoder.split();

    thread::scope(|s| {
        let sampler_thread = s.spawn(|| {
            let result = run_script(&mut sampler);
            done.store(true, Ordering::Release);
            result
        });

        while !done.load(Ordering::Acquire) {
            app.poll_events();
            thread::sleep(Duration::from_millis(1));
        }
        app.poll_events();

        sampler_thread
            .join()
            .map_err(|_| anyhow::anyhow!("sampler thread panicked"))?
    })?;
    drop(sampler);
    drop(app);

    println!();
    println!("Final count: {}", encoder.count());
    println!("Edge stats: {:?}", encoder.decoder().edge_stats());

    encoder.clear_count();
    println!("After clear: {}", encoder.count());
    Ok(())
}

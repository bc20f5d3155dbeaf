use std::env;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

use getopts::Options;
use metrics_registry::{InstrumentOption, Registry};
use rand::Rng;
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt().with_ansi(true).with_level(true).init();

    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = opts();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            error!("Failed to parse command line args: {}", f);
            return;
        }
    };

    if matches.opt_present("help") {
        print_usage(program, &opts);
        return;
    }

    let duration = matches
        .opt_str("duration")
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(5));
    let workers: usize =
        matches.opt_str("workers").and_then(|s| s.parse().ok()).unwrap_or(8);
    let keys: usize =
        matches.opt_str("keys").and_then(|s| s.parse::<usize>().ok()).unwrap_or(1024).max(1);
    let no_cleanup = matches.opt_present("no-cleanup");

    info!(?duration, workers, keys, no_cleanup, "registry-crusher");

    let registry = Arc::new(Registry::builder().with_lock_cleanup(!no_cleanup).build());
    let done = Arc::new(AtomicBool::new(false));
    let operations = Arc::new(AtomicUsize::new(0));

    let handles = (0..workers)
        .map(|id| {
            let registry = Arc::clone(&registry);
            let done = Arc::clone(&done);
            let operations = Arc::clone(&operations);
            thread::spawn(move || {
                let mut rng = rand::rng();
                let mut local = 0;
                while !done.load(Ordering::Relaxed) {
                    let name = format!("key_{}", rng.random_range(0..keys));
                    let options = [InstrumentOption::description(format!("worker {}", id))];
                    match rng.random_range(0..4) {
                        0 => registry.counter(&name, &options).add(1),
                        1 => registry.up_down_counter(&name, &options).add(rng.random_range(-5..5)),
                        2 => registry.histogram(&name, &options).record(rng.random::<f64>()),
                        _ => {
                            let _ = registry.counter_with_meta(&name);
                        }
                    }
                    local += 1;
                }
                operations.fetch_add(local, Ordering::Relaxed);
            })
        })
        .collect::<Vec<_>>();

    let start = Instant::now();
    thread::sleep(duration);
    done.store(true, Ordering::Relaxed);
    for handle in handles {
        if handle.join().is_err() {
            error!("worker panicked");
        }
    }
    let elapsed = start.elapsed();

    let total = operations.load(Ordering::Relaxed);
    info!(
        total,
        ops_per_sec = total as f64 / elapsed.as_secs_f64(),
        instruments = registry.len(),
        metadata = registry.list_metadata().len(),
        init_locks = registry.init_lock_count(),
        "finished"
    );

    if registry.len() != registry.list_metadata().len() {
        error!("instrument and metadata counts diverged");
    }
}

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn opts() -> Options {
    let mut opts = Options::new();

    opts.optopt("d", "duration", "number of seconds to run the crusher test", "INTEGER");
    opts.optopt("w", "workers", "number of worker threads", "INTEGER");
    opts.optopt("k", "keys", "number of distinct instrument names", "INTEGER");
    opts.optflag("", "no-cleanup", "retain per-key initialization locks");
    opts.optflag("h", "help", "print this help menu");

    opts
}

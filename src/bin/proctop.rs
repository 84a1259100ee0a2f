//! proctop - top-like process monitor.
//!
//! Samples /proc every interval and prints a system header followed by the
//! busiest processes, or one JSON document per cycle.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{Local, TimeZone};
use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use proctop::collector::traits::FileSystem;
use proctop::collector::{Collector, CollectorConfig};
#[cfg(not(target_os = "linux"))]
use proctop::collector::MockFs;
#[cfg(target_os = "linux")]
use proctop::collector::RealFs;
use proctop::fmt::{
    FmtStyle, format_clock, format_duration, format_gb, format_percent, progress_bar, truncate,
};
use proctop::model::SystemSnapshot;
use proctop::provider::{LiveProvider, SnapshotProvider};

const BAR_WIDTH: usize = 40;

/// Top-like process monitor for Linux.
#[derive(Parser)]
#[command(name = "proctop", about = "Top-like process monitor", version)]
struct Args {
    /// Refresh interval in seconds.
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Kernel clock ticks per second (USER_HZ).
    #[arg(long, default_value = "100")]
    clock_ticks: u64,

    /// Stop after this many refresh cycles. Runs until Ctrl-C if omitted.
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Number of processes to show.
    #[arg(short, long, default_value = "10")]
    top: usize,

    /// Print each snapshot as a JSON line instead of text.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Logs go to stderr so they never mix with the snapshot output.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn write_header(out: &mut impl Write, snapshot: &SystemSnapshot) -> io::Result<()> {
    let taken = Local
        .timestamp_opt(snapshot.timestamp, 0)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    writeln!(
        out,
        "{}  kernel {}  up {} ({})  {}",
        snapshot.os_name,
        snapshot.kernel_version,
        format_clock(snapshot.uptime_secs),
        format_duration(snapshot.uptime_secs as i64, FmtStyle::Detail),
        taken
    )?;
    writeln!(
        out,
        "CPU  {} {:>7}",
        progress_bar(snapshot.cpu.aggregate, BAR_WIDTH),
        format_percent(snapshot.cpu.aggregate)
    )?;
    for (i, core) in snapshot.cpu.cores.iter().enumerate() {
        writeln!(
            out,
            "{:<4} {} {:>7}",
            format!("cpu{}", i),
            progress_bar(*core, BAR_WIDTH),
            format_percent(*core)
        )?;
    }
    writeln!(
        out,
        "MEM  {} {:>7}",
        progress_bar(snapshot.mem_percent, BAR_WIDTH),
        format_percent(snapshot.mem_percent)
    )?;
    writeln!(
        out,
        "Processes: {} total, {} running, {} threads",
        snapshot.total_processes, snapshot.running_processes, snapshot.threads
    )
}

fn write_processes(out: &mut impl Write, snapshot: &SystemSnapshot, top: usize) -> io::Result<()> {
    writeln!(
        out,
        "{:>7} {:<10} {:>7} {:>8} {:>8}  COMMAND",
        "PID", "USER", "CPU%", "RAM(GB)", "TIME"
    )?;
    for process in snapshot.top_by_cpu(top) {
        writeln!(
            out,
            "{:>7} {:<10} {:>7} {:>8} {:>8}  {}",
            process.pid,
            truncate(&process.user, 10),
            format_percent(process.cpu_percent),
            format_gb(process.mem_gb),
            format_duration(process.uptime_secs as i64, FmtStyle::Compact),
            truncate(&process.cmdline, 60)
        )?;
    }
    Ok(())
}

fn print_snapshot(snapshot: &SystemSnapshot, args: &Args) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        serde_json::to_writer(&mut out, snapshot).map_err(io::Error::other)?;
        writeln!(out)?;
    } else {
        write_header(&mut out, snapshot)?;
        writeln!(out)?;
        write_processes(&mut out, snapshot, args.top)?;
        writeln!(out)?;
    }
    out.flush()
}

fn run<F: FileSystem + Clone>(mut provider: LiveProvider<F>, args: &Args, running: &AtomicBool) {
    let interval = Duration::from_secs(args.interval);
    let mut cycles: u64 = 0;

    while running.load(Ordering::SeqCst) {
        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
        if !running.load(Ordering::SeqCst) {
            break;
        }

        if provider.advance().is_none()
            && let Some(e) = provider.last_error()
        {
            error!("Refresh failed: {}", e);
        }
        if let Some(timing) = provider.collector_timing() {
            debug!(
                total_ms = timing.total.as_millis() as u64,
                processes_ms = timing.processes.as_millis() as u64,
                "cycle timing"
            );
        }

        if let Some(snapshot) = provider.current()
            && let Err(e) = print_snapshot(snapshot, args)
        {
            // Broken pipe: the reader went away.
            debug!("Output closed: {}", e);
            break;
        }

        cycles += 1;
        if args.count.is_some_and(|limit| cycles >= limit) {
            break;
        }
    }
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("proctop {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: interval={}s, proc={}, clock_ticks={}",
        args.interval, args.proc_path, args.clock_ticks
    );

    let config = CollectorConfig::new(&args.proc_path).with_clock_ticks(args.clock_ticks);

    #[cfg(target_os = "linux")]
    let collector = Collector::with_config(RealFs::new(), config);
    #[cfg(not(target_os = "linux"))]
    let collector = Collector::with_config(MockFs::typical_system(), config);

    if !collector.user_table().is_loaded() {
        warn!("No user database loaded, showing numeric uids");
    }
    info!("Sampling {} cores", collector.core_count());

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    run(LiveProvider::new(collector), &args, &running);

    info!("Shutting down");
}

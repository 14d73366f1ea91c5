//! Scan keyed request timestamps for periodic beaconing.
//!
//! Run with `RUST_LOG=agcd_period=debug` to see per-group estimation logs.

use agcd_period::detection::{BeaconScan, BeaconScanConfig, AGCD};
use chrono::{Duration, TimeZone, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> agcd_period::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // A single source polling every 300 seconds with small jitter and one
    // missed poll.
    let start = Utc.with_ymd_and_hms(2014, 9, 15, 8, 0, 0).unwrap();
    let jitter = [0, 1, -1, 2, 0, 1, 0, -2, 1, 0, 0, 1];
    let polls: Vec<_> = jitter
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 6)
        .map(|(i, &j)| start + Duration::seconds(300 * i as i64 + j))
        .collect();

    let mut agcd = AGCD::new();
    let summary = agcd.estimate_period_datetimes(&polls)?;
    println!(
        "{} events, tmin {}s, noise width {}",
        summary.events,
        summary.min_gap,
        summary.noise.width()
    );
    println!("Maximum period found p = {}", agcd.best_period()?);
    println!("Binary entropy = {:.2}", agcd.binary_entropy()?);
    print!("{}", agcd.histogram().report(agcd.config().tie_break));

    // Keyed scan over several sources.
    let base = start.timestamp();
    let mut records = Vec::new();
    for i in 0..20 {
        records.push((("192.168.1.20", "/gate.php"), base + 120 * i + (i % 3)));
    }
    for t in [7, 95, 96, 410, 1333, 1502] {
        records.push((("192.168.1.31", "/index.html"), base + t));
    }
    records.push((("192.168.1.44", "/favicon.ico"), base));

    let scan = BeaconScan::new(BeaconScanConfig::new());
    let result = scan.scan_records(records)?;
    for beacon in &result.beacons {
        println!(
            "{:?}: period {}s, entropy {:.2}, {} events",
            beacon.key, beacon.period, beacon.entropy, beacon.events
        );
    }
    for (key, err) in &result.skipped {
        println!("{:?}: skipped ({})", key, err);
    }

    Ok(())
}

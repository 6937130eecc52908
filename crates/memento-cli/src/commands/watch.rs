use std::io::Write;
use std::time::{Duration, Instant};

use chrono::Local;
use clap::Args;
use memento_core::{
    calculate, convert_to_unit, FileKvStore, MilestoneTracker, Scope, Settings, Unit,
};

/// How often the milestone check runs inside the watch loop.
const MILESTONE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Args)]
pub struct WatchArgs {
    /// Time scope: day, week, month, year, life, goal
    #[arg(long, default_value = "day")]
    pub scope: String,
    /// Display unit: years, days, hours, minutes, seconds
    #[arg(long, default_value = "seconds")]
    pub unit: String,
    /// Count only disposable (free) time
    #[arg(long)]
    pub disposable: bool,
    /// Redraw interval in milliseconds
    #[arg(long, default_value_t = 250)]
    pub interval_ms: u64,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scope: Scope = args.scope.parse()?;
    let unit: Unit = args.unit.parse()?;
    let settings = Settings::load();

    let store = FileKvStore::open_default()?;
    let now = Local::now().naive_local();
    let mut tracker = MilestoneTracker::load(store, now.date());
    let mut last_check: Option<Instant> = None;

    let mut stdout = std::io::stdout();
    loop {
        let now = Local::now().naive_local();
        let result = calculate(scope, &settings, args.disposable, now);

        if last_check.map_or(true, |at| at.elapsed() >= MILESTONE_INTERVAL) {
            for notification in tracker.check(scope, &result, &settings, now) {
                tracker.mark_shown(&notification.id);
                println!("\n{} {}", notification.icon, notification.message);
            }
            last_check = Some(Instant::now());
        }

        let value = convert_to_unit(result.remaining_ms, unit);
        print!(
            "\r\x1b[2K{value} {} remaining  |  {}  |  {:.1}% elapsed",
            unit.label(),
            result.context,
            result.elapsed_ratio * 100.0
        );
        stdout.flush()?;
        std::thread::sleep(Duration::from_millis(args.interval_ms));
    }
}

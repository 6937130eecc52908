use chrono::Local;
use clap::Subcommand;
use memento_core::{calculate, FileKvStore, MilestoneTracker, Scope, Settings};

#[derive(Subcommand)]
pub enum MilestoneAction {
    /// Evaluate milestones for a scope and mark the crossed ones shown
    Check {
        /// Time scope: day, week, month, year, life, goal
        #[arg(long, default_value = "day")]
        scope: String,
        /// Count only disposable (free) time
        #[arg(long)]
        disposable: bool,
        /// Report without marking anything shown
        #[arg(long)]
        dry_run: bool,
    },
    /// List identifiers already shown
    List,
    /// Clear all milestone state, including life anniversaries
    Reset,
    /// Print the daily reminder (not gated on milestone state)
    Remind,
}

pub fn run(action: MilestoneAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MilestoneAction::Check {
            scope,
            disposable,
            dry_run,
        } => {
            let scope: Scope = scope.parse()?;
            let settings = Settings::load();
            let now = Local::now().naive_local();
            let store = FileKvStore::open_default()?;
            let mut tracker = MilestoneTracker::load(store, now.date());

            let result = calculate(scope, &settings, disposable, now);
            let notifications = tracker.check(scope, &result, &settings, now);
            if notifications.is_empty() {
                println!("no new milestones");
            }
            for notification in notifications {
                if !dry_run {
                    tracker.mark_shown(&notification.id);
                }
                println!("{} {}", notification.icon, notification.message);
            }
        }
        MilestoneAction::List => {
            let now = Local::now().naive_local();
            let store = FileKvStore::open_default()?;
            let tracker = MilestoneTracker::load(store, now.date());
            for id in tracker.shown() {
                println!("{id}");
            }
        }
        MilestoneAction::Reset => {
            let now = Local::now().naive_local();
            let store = FileKvStore::open_default()?;
            let mut tracker = MilestoneTracker::load(store, now.date());
            tracker.reset(now.date());
            println!("milestone state cleared");
        }
        MilestoneAction::Remind => {
            // The background-trigger channel: fires daily with no
            // knowledge of shown identifiers.
            println!("⏳ Time is limited today. Check how much of it is left.");
        }
    }
    Ok(())
}

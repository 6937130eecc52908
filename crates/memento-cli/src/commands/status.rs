use chrono::Local;
use clap::Args;
use memento_core::countdown::units::group_thousands;
use memento_core::{
    calculate, color_for_ratio, convert_to_unit, decompose, message_for_ratio, Accent, Breakdown,
    CountdownResult, Scope, Settings, Unit,
};

#[derive(Args)]
pub struct StatusArgs {
    /// Time scope: day, week, month, year, life, goal
    #[arg(long, default_value = "day")]
    pub scope: String,
    /// Display unit: years, days, hours, minutes, seconds
    #[arg(long, default_value = "seconds")]
    pub unit: String,
    /// Count only disposable (free) time
    #[arg(long)]
    pub disposable: bool,
    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(serde::Serialize)]
struct StatusView {
    scope: Scope,
    unit: Unit,
    value: String,
    result: CountdownResult,
    breakdown: Breakdown,
    accent: Accent,
    message: &'static str,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scope: Scope = args.scope.parse()?;
    let unit: Unit = args.unit.parse()?;
    let settings = Settings::load();
    let now = Local::now().naive_local();

    let result = calculate(scope, &settings, args.disposable, now);
    let value = convert_to_unit(result.remaining_ms, unit);
    let breakdown = decompose(result.remaining_ms);
    let accent = color_for_ratio(result.elapsed_ratio);
    let message = message_for_ratio(result.elapsed_ratio, now);

    if args.json {
        let view = StatusView {
            scope,
            unit,
            value,
            result,
            breakdown,
            accent,
            message,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let elapsed_pct = result.elapsed_ratio * 100.0;
    println!("{value} {} remaining", unit.label());
    println!("{}", result.context);
    println!(
        "elapsed {elapsed_pct:.1}%  remaining {:.1}%  [{}]",
        100.0 - elapsed_pct,
        accent.color
    );
    println!(
        "{} days {:02}:{:02}:{:02}",
        group_thousands(breakdown.days as i64),
        breakdown.hours,
        breakdown.minutes,
        breakdown.seconds
    );
    println!("{message}");
    Ok(())
}

use clap::Args;
use studyroom_core::timeline::{minutes_to_hours, total_free_minutes};
use studyroom_core::{Config, DayOfWeek};

use super::{load_timetable, parse_day, print_json, TimetableArg};

#[derive(Args)]
pub struct FreeArgs {
    #[command(flatten)]
    pub input: TimetableArg,
    /// Only show one day (name, index 0-6 or "today")
    #[arg(long, short = 'd', value_parser = parse_day)]
    pub day: Option<DayOfWeek>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FreeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let deriver = config.deriver()?;
    let timetable = load_timetable(&args.input.timetable)?;

    let mut week = deriver.derive_week(&timetable);
    if let Some(day) = args.day {
        week.retain(|d, _| *d == day);
    }

    if args.json {
        return print_json(&week);
    }

    for (day, intervals) in &week {
        println!(
            "{day} ({:.1}h free)",
            minutes_to_hours(total_free_minutes(intervals))
        );
        if intervals.is_empty() {
            println!("  (none)");
        }
        for interval in intervals {
            println!(
                "  {}-{}  {:>3} min  {:?}",
                interval.start,
                interval.end,
                interval.duration_minutes(),
                interval.size()
            );
        }
    }
    Ok(())
}

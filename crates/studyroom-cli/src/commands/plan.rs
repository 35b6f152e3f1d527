use clap::Args;
use studyroom_core::{Config, DayOfWeek, DayPlan};

use super::{load_subjects, load_timetable, parse_day, print_json, SubjectsArg, TimetableArg};

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub timetable: TimetableArg,
    #[command(flatten)]
    pub subjects: SubjectsArg,
    /// Only show one day (name, index 0-6 or "today")
    #[arg(long, short = 'd', value_parser = parse_day)]
    pub day: Option<DayOfWeek>,
    /// List suggested activities under each block
    #[arg(long)]
    pub materials: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let timetable = load_timetable(&args.timetable.timetable)?;
    let subjects = load_subjects(&args.subjects.subjects)?;

    let plan = config
        .allocator()
        .plan(&config.deriver()?, &timetable, &subjects);

    if let Some(day) = args.day {
        let day_plan = plan
            .day(day)
            .ok_or_else(|| format!("no plan for {day}"))?;
        if args.json {
            return print_json(day_plan);
        }
        print_day(day_plan, args.materials);
        return Ok(());
    }

    if args.json {
        return print_json(&plan);
    }

    println!(
        "{} subject(s), {} major, {} high priority",
        plan.summary.total_subjects,
        plan.summary.major_subjects,
        plan.summary.high_priority_subjects
    );
    for day_plan in &plan.days {
        println!();
        print_day(day_plan, args.materials);
    }
    println!();
    println!(
        "Total study time: {:.1}h",
        f64::from(plan.total_allocated_minutes()) / 60.0
    );
    Ok(())
}

fn print_day(day_plan: &DayPlan, materials: bool) {
    println!(
        "{}: {:.1}h of {:.1}h free",
        day_plan.day,
        day_plan.allocated_hours(),
        f64::from(day_plan.free_minutes()) / 60.0
    );
    if day_plan.blocks.is_empty() {
        println!("  (no study blocks)");
    }
    for block in &day_plan.blocks {
        println!(
            "  {}-{}  {:<7} {} [{}]",
            block.start,
            block.end,
            block.kind.as_str(),
            block.subject,
            block.priority.as_str()
        );
        if materials {
            for item in block.kind.recommended_materials() {
                println!("      - {item}");
            }
        }
    }
}

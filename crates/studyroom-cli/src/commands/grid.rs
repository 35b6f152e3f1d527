use std::path::PathBuf;

use clap::Args;
use studyroom_core::{Config, WeeklyPlan};

use super::{load_subjects, load_timetable, print_json, TimetableArg};

#[derive(Args)]
pub struct GridArgs {
    #[command(flatten)]
    pub timetable: TimetableArg,
    /// Subjects file; when given, study blocks are planned and shown too
    #[arg(long, short = 's')]
    pub subjects: Option<PathBuf>,
    /// Column width in characters
    #[arg(long, default_value_t = 12)]
    pub width: usize,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: GridArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let builder = config.grid_builder()?;
    let timetable = load_timetable(&args.timetable.timetable)?;

    let grid = match &args.subjects {
        Some(path) => {
            let subjects = load_subjects(path)?;
            let plan: WeeklyPlan = config
                .allocator()
                .plan(&config.deriver()?, &timetable, &subjects);
            builder.build_plan(&timetable, &plan)
        }
        None => builder.build(timetable.sessions(), &[]),
    };

    if args.json {
        return print_json(&grid);
    }

    print!("{}", grid.render_ascii(args.width));
    Ok(())
}

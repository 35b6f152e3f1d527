use clap::Args;

use super::{load_subjects, print_json, SubjectsArg};

#[derive(Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: SubjectsArg,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let subjects = load_subjects(&args.input.subjects)?;

    if args.json {
        return print_json(&subjects);
    }

    if subjects.is_empty() {
        println!("No subjects.");
        return Ok(());
    }
    for s in &subjects {
        let major = if s.is_major { " (major)" } else { "" };
        println!(
            "{:<10} {}{major}  weight {:.1}",
            s.priority_label.as_str(),
            s.subject,
            s.weight
        );
    }
    Ok(())
}

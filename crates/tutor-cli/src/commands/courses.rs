use anyhow::Result;
use colored::Colorize;
use tutor_infrastructure::CourseCatalog;

pub fn run() -> Result<()> {
    let catalog = CourseCatalog::load()?;
    if catalog.is_empty() {
        println!("{}", "No courses configured.".yellow());
        return Ok(());
    }

    println!("{}", "Available courses:".bright_magenta().bold());
    for course in catalog.courses() {
        println!(
            "  {} {}",
            course.name.bold(),
            format!("({})", course.document).bright_black()
        );
    }

    Ok(())
}

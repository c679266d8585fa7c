mod menu;

use anyhow::Result;
use clap::Parser;
use course_registry::{logging, AppConfig, DEFAULT_MAX_CREDITS};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "course-registry")]
#[command(about = "Course registration records: students, courses, enrollments and backups")]
struct Args {
    /// Base data directory for exports and backups (default: ~/ccrm_data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Maximum total credits a student may hold
    #[arg(long, default_value_t = DEFAULT_MAX_CREDITS)]
    max_credits: u32,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_cli_logger(args.verbose);

    let mut config = AppConfig::from_env().with_max_credits(args.max_credits);
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }

    tracing::debug!(?config, "configuration resolved");
    println!("CCRM started. Data folder: {}", config.data_dir.display());

    let stdin = io::stdin();
    let mut menu = menu::Menu::new(stdin.lock(), io::stdout(), config);
    menu.run()
}

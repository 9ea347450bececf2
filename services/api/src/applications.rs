use crate::infra::build_service;
use clap::Args;
use registration_intake::config::AppConfig;
use registration_intake::error::AppError;
use registration_intake::workflows::registration::{Application, ApplicationId};

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Maximum number of submissions to print, newest first
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Application ID, e.g. APP17175966151234
    pub(crate) application_id: String,
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.storage, &config.notify)?;
    let applications = service.recent(args.limit)?;

    println!(
        "Applications in {} (showing {})",
        service.repository().describe(),
        applications.len()
    );
    if applications.is_empty() {
        println!("  No submissions yet");
        return Ok(());
    }
    for application in &applications {
        println!("  {}", summary_line(application));
    }
    Ok(())
}

pub(crate) fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.storage, &config.notify)?;
    let application = service.get(&ApplicationId(args.application_id))?;

    match serde_json::to_string_pretty(&application) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("  Unable to render application: {err}"),
    }
    Ok(())
}

fn summary_line(application: &Application) -> String {
    format!(
        "{}  {}  {} <{}>  {}",
        application.application_id,
        application.submitted_date.format("%Y-%m-%d %H:%M:%S"),
        application.full_name(),
        application.email,
        application.course
    )
}

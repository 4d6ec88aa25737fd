use crate::cli::SubmitCommand;
use bytes::Bytes;
use clap::Args;
use job_portal::config::AppConfig;
use job_portal::error::AppError;
use job_portal::intake::{
    validate, Application, CompanyApplication, EmployeeApplication, HttpTransport, JobType,
    ResumeUpload, ResumeUploader, SkillLevel, SubmissionResult, SubmissionService,
};
use job_portal::telemetry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CompanyArgs {
    /// Name of the hiring company
    #[arg(long)]
    pub(crate) company_name: String,
    /// Contact address for the opening
    #[arg(long)]
    pub(crate) company_email: String,
    /// Role being hired for
    #[arg(long)]
    pub(crate) role: String,
    /// Required skill (repeat for several). Defaults to React and TypeScript.
    #[arg(long)]
    pub(crate) skill: Vec<String>,
    /// Beginner, Intermediate or Advanced
    #[arg(long, default_value = "Intermediate")]
    pub(crate) skill_level: SkillLevel,
    #[arg(long, default_value = "")]
    pub(crate) education_level: String,
    #[arg(long, default_value = "United States")]
    pub(crate) country: String,
    /// Remote, Hybrid or On-site
    #[arg(long, default_value = "Remote")]
    pub(crate) job_type: JobType,
}

#[derive(Args, Debug)]
pub(crate) struct EmployeeArgs {
    #[arg(long)]
    pub(crate) full_name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, default_value = "")]
    pub(crate) phone: String,
    /// Beginner, Intermediate or Advanced
    #[arg(long, default_value = "Intermediate")]
    pub(crate) skill_level: SkillLevel,
    /// PDF, DOC or DOCX file; the type is taken from the extension
    #[arg(long)]
    pub(crate) resume: PathBuf,
}

pub(crate) async fn run_submit(command: SubmitCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let application = match command {
        SubmitCommand::Company(args) => Application::Company(company_application(args)),
        SubmitCommand::Employee(args) => {
            let uploader = ResumeUploader::new(config.uploads.resume_policy());
            Application::Employee(employee_application(args, &uploader).await?)
        }
    };

    let errors = validate(&application);
    if !errors.is_empty() {
        println!("The {} form has problems:", application.kind());
        for (field, message) in errors.iter() {
            println!("  - {field}: {message}");
        }
        return Err(errors.into());
    }

    let transport = Arc::new(HttpTransport::new()?);
    let service = SubmissionService::from_config(&config.webhook, transport);
    let result = service.submit(&application).await;
    settle(result)
}

/// Print the outcome; anything short of success becomes an error so the process exits non-zero.
fn settle(result: SubmissionResult) -> Result<(), AppError> {
    render_result(&result);
    if result.success {
        Ok(())
    } else {
        Err(AppError::Submission(result))
    }
}

pub(crate) fn company_application(args: CompanyArgs) -> CompanyApplication {
    let CompanyArgs {
        company_name,
        company_email,
        role,
        skill,
        skill_level,
        education_level,
        country,
        job_type,
    } = args;

    let mut application = CompanyApplication {
        company_name,
        company_email,
        role,
        skill_level,
        education_level,
        country,
        job_type,
        ..CompanyApplication::default()
    };

    if !skill.is_empty() {
        application.skills.clear();
        for raw in &skill {
            if !application.add_skill(raw) {
                tracing::warn!(skill = %raw, "skill ignored (blank, duplicate or list full)");
            }
        }
    }

    application
}

pub(crate) async fn employee_application(
    args: EmployeeArgs,
    uploader: &ResumeUploader,
) -> Result<EmployeeApplication, AppError> {
    let EmployeeArgs {
        full_name,
        email,
        phone,
        skill_level,
        resume,
    } = args;

    let file_name = file_name(&resume);
    let mime_type = guess_mime(&resume);
    let declared_size = tokio::fs::metadata(&resume).await?.len();
    uploader.screen(&file_name, &mime_type, declared_size)?;

    let content = Bytes::from(tokio::fs::read(&resume).await?);
    let attachment = uploader.accept(ResumeUpload {
        file_name,
        mime_type,
        declared_size,
        content,
    })?;

    Ok(EmployeeApplication {
        full_name,
        email,
        phone,
        skill_level,
        resume: Some(attachment),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string())
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn render_result(result: &SubmissionResult) {
    if result.success {
        println!("{}", result.message);
    } else {
        println!("Submission failed: {}", result.message);
    }
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Result payload unavailable: {err}"),
    }
}

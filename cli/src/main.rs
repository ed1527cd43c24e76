
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use jobportal::config::ConfigError;
use jobportal::net::types::{
    ApplicationStatus, Company, CompanyPayload, CompanySearch, Job, JobApplication, JobFilter, JobPayload, JobSearch,
};
use jobportal::routes::Route;
use jobportal::state::applications::{JobApplicationsView, MyApplications};
use jobportal::state::companies::CompanyDirectory;
use jobportal::state::content::TieredContent;
use jobportal::state::jobs::{JobBoard, JobQuery};
use jobportal::state::list::ListState;
use jobportal::state::notify::{Notification, NotificationLevel, Notifier};
use jobportal::state::storage::FileStorage;
use jobportal::util::auth::{GuardState, RouteGuard};
use jobportal::util::nav::visible_actions;
use jobportal::{ApiClient, ApiError, PortalConfig, Role, SessionStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{route} is not available to this session; redirecting to {target}")]
    Redirected { route: Route, target: Route },
    #[error("unknown route: {0}")]
    UnknownRoute(String),
    #[error("unknown role `{0}`; expected job_seeker, employer or admin")]
    UnknownRole(String),
    #[error("{0}")]
    ListFailed(String),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "jobportal", about = "Job portal client")]
struct Cli {
    /// Overrides `JOBPORTAL_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    /// Overrides `JOBPORTAL_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session.
    Signin {
        #[arg(long)]
        username: String,
        #[arg(long, env = "JOBPORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBPORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "job_seeker")]
        role: String,
    },
    /// Confirm an account with the emailed token.
    Confirm { token: String },
    /// Exchange the stored refresh token for a new access token.
    Refresh,
    Logout,
    Whoami,
    /// List navigation actions available to this session.
    Nav,
    /// Run the route guard for a path.
    Open { path: String },
    Jobs(JobsCommand),
    Companies(CompaniesCommand),
    Applications(ApplicationsCommand),
    /// Fetch the role-tiered content board.
    Content,
}

#[derive(Args, Debug)]
struct JobsCommand {
    #[command(subcommand)]
    command: JobsSubcommand,
}

#[derive(Args, Debug)]
struct JobFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long)]
    salary: f64,
    #[arg(long, default_value = "FULL_TIME")]
    job_type: String,
    #[arg(long)]
    company_id: i64,
}

impl From<JobFields> for JobPayload {
    fn from(fields: JobFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            location: fields.location,
            salary: fields.salary,
            job_type: fields.job_type,
            company_id: fields.company_id,
        }
    }
}

#[derive(Subcommand, Debug)]
enum JobsSubcommand {
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    Search {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    Filter {
        #[arg(long)]
        min_salary: Option<f64>,
        #[arg(long)]
        max_salary: Option<f64>,
        #[arg(long, default_value = "")]
        job_type: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    Show {
        job_id: String,
    },
    ByCompany {
        company_id: String,
    },
    Create(JobFields),
    Update {
        job_id: String,
        #[command(flatten)]
        fields: JobFields,
    },
    Delete {
        job_id: String,
    },
}

#[derive(Args, Debug)]
struct CompaniesCommand {
    #[command(subcommand)]
    command: CompaniesSubcommand,
}

#[derive(Args, Debug)]
struct CompanyFields {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    industry: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    website: String,
}

impl From<CompanyFields> for CompanyPayload {
    fn from(fields: CompanyFields) -> Self {
        Self {
            name: fields.name,
            industry: fields.industry,
            description: fields.description,
            address: fields.address,
            website: fields.website,
        }
    }
}

#[derive(Subcommand, Debug)]
enum CompaniesSubcommand {
    Search {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        industry: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    Show {
        company_id: String,
    },
    Register(CompanyFields),
    Update {
        company_id: String,
        #[command(flatten)]
        fields: CompanyFields,
    },
    Verify {
        company_id: String,
    },
}

#[derive(Args, Debug)]
struct ApplicationsCommand {
    #[command(subcommand)]
    command: ApplicationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApplicationsSubcommand {
    Apply {
        job_id: i64,
        #[arg(long, default_value = "")]
        cover_letter: String,
        /// Resume file name, stored as `/uploads/<name>`.
        #[arg(long)]
        resume: Option<String>,
    },
    Mine,
    ByJob {
        job_id: String,
    },
    Status {
        application_id: String,
        /// PENDING, REVIEWED, INTERVIEW, HIRED or REJECTED.
        status: String,
    },
    Withdraw {
        application_id: String,
    },
}

/// Prints notifications to stderr so stdout stays machine-readable.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => eprintln!("ok: {}", notification.message),
            NotificationLevel::Error => eprintln!("error: {}", notification.message),
        }
    }
}

#[derive(Clone)]
struct CliContext {
    api: ApiClient,
    session: SessionStore,
    page_size: u32,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = PortalConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_owned();
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }

    tracing::debug!(api_url = %config.api_url, session_file = %config.session_file.display(), "cli configured");

    let session = SessionStore::open(Arc::new(FileStorage::new(config.session_file.clone())));
    let api = ApiClient::from_config(&config, session.clone())?.with_notifier(Arc::new(StderrNotifier));
    let ctx = CliContext { api, session, page_size: config.page_size };

    match cli.command {
        Command::Signin { username, password } => run_signin(&ctx, &username, &password).await,
        Command::Signup { username, email, password, role } => {
            let role = signup_role(&role)?;
            let response = ctx.api.sign_up(&username, &email, &password, &role).await?;
            println!("{}", response.message);
            Ok(())
        }
        Command::Confirm { token } => {
            let response = ctx.api.confirm_registration(&token).await?;
            println!("{}", response.message);
            Ok(())
        }
        Command::Refresh => {
            ctx.api.refresh().await?;
            println!("access token refreshed");
            Ok(())
        }
        Command::Logout => {
            let remote = ctx.api.logout().await;
            println!("signed out");
            remote.map_err(CliError::from)
        }
        Command::Whoami => {
            print_whoami(&ctx.session);
            Ok(())
        }
        Command::Nav => {
            for action in visible_actions(&ctx.session.snapshot()) {
                let target = action.route().map_or_else(|| "-".to_owned(), |route| route.path());
                println!("{:<18} {target}", action.label());
            }
            Ok(())
        }
        Command::Open { path } => {
            let route = Route::parse(&path).ok_or(CliError::UnknownRoute(path))?;
            guard(&ctx, route.clone())?;
            println!("{route}: authorized");
            Ok(())
        }
        Command::Jobs(jobs) => run_jobs(&ctx, jobs).await,
        Command::Companies(companies) => run_companies(&ctx, companies).await,
        Command::Applications(applications) => run_applications(&ctx, applications).await,
        Command::Content => {
            let content = TieredContent::load(&ctx.api, &ctx.session.snapshot()).await;
            if let Some(error) = &content.error {
                eprintln!("error: {error}");
            }
            println!("public:   {}", content.public);
            println!("user:     {}", content.user);
            println!("employer: {}", content.employer);
            println!("admin:    {}", content.admin);
            Ok(())
        }
    }
}

/// Run the screen's guard and refuse with the redirect target.
fn guard(ctx: &CliContext, route: Route) -> Result<(), CliError> {
    let mut guard = RouteGuard::new(route);
    let state = guard.check_session(&ctx.session).clone();
    match state {
        GuardState::Redirecting(target) => Err(CliError::Redirected { route: guard.route().clone(), target }),
        GuardState::Checking | GuardState::Authorized => Ok(()),
    }
}

async fn run_signin(ctx: &CliContext, username: &str, password: &str) -> Result<(), CliError> {
    let auth = ctx.api.sign_in(username, password).await?;
    let roles: Vec<String> = auth.identity.roles().iter().map(Role::authority).collect();
    println!("signed in as {} ({})", auth.identity.username, roles.join(", "));
    Ok(())
}

fn print_whoami(session: &SessionStore) {
    let snapshot = session.snapshot();
    match &snapshot.identity {
        Some(identity) if snapshot.is_logged_in => {
            println!("{} <{}> id={}", identity.username, identity.email, identity.id);
            let roles: Vec<&str> = identity.roles().iter().map(Role::label).collect();
            println!("roles: {}", roles.join(", "));
        }
        _ => println!("not signed in"),
    }
}

async fn run_jobs(ctx: &CliContext, jobs: JobsCommand) -> Result<(), CliError> {
    match jobs.command {
        JobsSubcommand::List { page } => show_job_board(ctx, JobQuery::All, page).await,
        JobsSubcommand::Search { title, location, company, page } => {
            let query = JobQuery::from_form(JobSearch { title, location, company }, JobFilter::default());
            show_job_board(ctx, query, page).await
        }
        JobsSubcommand::Filter { min_salary, max_salary, job_type, location, page } => {
            let filter = JobFilter { min_salary, max_salary, job_type, location };
            show_job_board(ctx, JobQuery::from_form(JobSearch::default(), filter), page).await
        }
        JobsSubcommand::Show { job_id } => print_json(&ctx.api.get_job(&job_id).await?),
        JobsSubcommand::ByCompany { company_id } => {
            let jobs = ctx.api.jobs_by_company(&company_id).await?;
            jobs.iter().for_each(print_job_line);
            Ok(())
        }
        JobsSubcommand::Create(fields) => {
            guard(ctx, Route::CreateJob)?;
            print_json(&ctx.api.create_job(&fields.into()).await?)
        }
        JobsSubcommand::Update { job_id, fields } => {
            guard(ctx, Route::EditJob(job_id.clone()))?;
            print_json(&ctx.api.update_job(&job_id, &fields.into()).await?)
        }
        JobsSubcommand::Delete { job_id } => {
            guard(ctx, Route::EmployerDashboard)?;
            let mut board = JobBoard::new(ctx.page_size);
            board.delete(&ctx.api, &job_id).await?;
            Ok(())
        }
    }
}

async fn show_job_board(ctx: &CliContext, query: JobQuery, page: u32) -> Result<(), CliError> {
    let mut board = JobBoard::new(ctx.page_size);
    board.set_query(query);
    board.load_page(&ctx.api, page).await;
    print_list(&board.list, print_job_line)
}

fn print_job_line(job: &Job) {
    let salary = job.salary.map_or_else(|| "-".to_owned(), |s| format!("{s:.0}"));
    println!(
        "{:>6}  {:<32} {:<20} {:<16} {salary}",
        job.id,
        job.title,
        job.company_name.as_deref().unwrap_or("-"),
        job.location,
    );
}

async fn run_companies(ctx: &CliContext, companies: CompaniesCommand) -> Result<(), CliError> {
    match companies.command {
        CompaniesSubcommand::Search { name, industry, page } => {
            let mut directory = CompanyDirectory::new(ctx.page_size);
            directory.set_search(CompanySearch { name, industry });
            directory.load_page(&ctx.api, page).await;
            print_list(&directory.list, print_company_line)
        }
        CompaniesSubcommand::Show { company_id } => print_json(&ctx.api.get_company(&company_id).await?),
        CompaniesSubcommand::Register(fields) => {
            guard(ctx, Route::RegisterCompany)?;
            print_json(&ctx.api.register_company(&fields.into()).await?)
        }
        CompaniesSubcommand::Update { company_id, fields } => {
            guard(ctx, Route::EditCompany(company_id.clone()))?;
            print_json(&ctx.api.update_company(&company_id, &fields.into()).await?)
        }
        CompaniesSubcommand::Verify { company_id } => {
            guard(ctx, Route::AdminDashboard)?;
            let mut directory = CompanyDirectory::new(ctx.page_size);
            directory.verify(&ctx.api, &company_id).await?;
            Ok(())
        }
    }
}

fn print_company_line(company: &Company) {
    let badge = if company.verified { "verified" } else { "" };
    println!("{:>6}  {:<32} {:<20} {badge}", company.id, company.name, company.industry);
}

async fn run_applications(ctx: &CliContext, applications: ApplicationsCommand) -> Result<(), CliError> {
    match applications.command {
        ApplicationsSubcommand::Apply { job_id, cover_letter, resume } => {
            guard(ctx, Route::Apply(job_id.to_string()))?;
            print_json(&ctx.api.apply_for_job(job_id, &cover_letter, resume.as_deref()).await?)
        }
        ApplicationsSubcommand::Mine => {
            guard(ctx, Route::MyApplications)?;
            let mut view = MyApplications::new();
            view.refresh(&ctx.api).await;
            print_list(&view.list, print_application_line)
        }
        ApplicationsSubcommand::ByJob { job_id } => {
            guard(ctx, Route::JobApplications(job_id.clone()))?;
            let mut view = JobApplicationsView::new(job_id);
            view.refresh(&ctx.api).await;
            print_list(&view.list, print_application_line)
        }
        ApplicationsSubcommand::Status { application_id, status } => {
            guard(ctx, Route::EmployerDashboard)?;
            let status = ApplicationStatus::parse(&status);
            print_json(&ctx.api.update_application_status(&application_id, &status).await?)
        }
        ApplicationsSubcommand::Withdraw { application_id } => {
            guard(ctx, Route::MyApplications)?;
            MyApplications::new().withdraw(&ctx.api, &application_id).await?;
            Ok(())
        }
    }
}

fn print_application_line(application: &JobApplication) {
    println!(
        "{:>6}  {:<32} {:<20} {}",
        application.id,
        application.job_title.as_deref().unwrap_or("-"),
        application.applicant_name.as_deref().or(application.company_name.as_deref()).unwrap_or("-"),
        application.status.label(),
    );
}

/// A failed fetch becomes the command's error so the exit status reflects it.
fn print_list<T>(list: &ListState<T>, line: impl Fn(&T)) -> Result<(), CliError> {
    if let Some(error) = &list.error {
        return Err(CliError::ListFailed(error.clone()));
    }
    if list.is_empty() {
        println!("(none)");
        return Ok(());
    }
    list.items.iter().for_each(line);
    if list.total_pages > 1 {
        println!("page {}/{}", list.page + 1, list.total_pages);
    }
    Ok(())
}

/// Roles a new account may request. Unrecognized names are refused here
/// rather than forwarded to the backend.
fn signup_role(raw: &str) -> Result<Role, CliError> {
    match Role::parse(raw) {
        Some(role @ (Role::JobSeeker | Role::Employer | Role::Admin)) => Ok(role),
        _ => Err(CliError::UnknownRole(raw.to_owned())),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

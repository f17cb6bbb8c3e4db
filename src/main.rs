use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emarve::api::{CourseApi, HttpCourseApi};
use emarve::config::ClientConfig;
use emarve::models::FileUpload;
use emarve::pages::{CatalogPage, CourseDetailsPage, PageContext};
use emarve::services::AuthService;
use emarve::session::{FileStore, Session};
use emarve::views::{CourseForm, LoginForm, RegisterForm};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Course catalog client
#[derive(Parser, Debug)]
#[command(name = "emarve", version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides EMARVE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Session file (overrides EMARVE_SESSION_FILE)
    #[arg(long, global = true, value_name = "FILE")]
    session_file: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Register as an instructor
        #[arg(long)]
        instructor: bool,
    },
    /// Course list for the signed-in role
    Home {
        #[arg(long)]
        search: Option<String>,
    },
    /// Subscriptions, or taught courses for admins
    MyCourses,
    /// Enroll in a course
    Subscribe { course_id: i64 },
    /// Course details and admin course management
    Course {
        #[command(subcommand)]
        action: CourseCommand,
    },
    /// Run the in-memory backend
    MockServer {
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Subcommand, Debug)]
enum CourseCommand {
    /// Show a course (defaults to the last one opened)
    Show { id: Option<i64> },
    Comment { text: String },
    Upload { path: PathBuf },
    Create(CourseFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: CourseFields,
    },
    Delete { id: i64 },
}

#[derive(clap::Args, Debug)]
struct CourseFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    instructor: String,
    /// Weeks
    #[arg(long)]
    duration: i64,
    #[arg(long)]
    requirement: String,
}

impl CourseFields {
    fn into_form(self) -> CourseForm {
        CourseForm {
            title: self.title,
            description: self.description,
            category: self.category,
            instructor: self.instructor,
            duration: self.duration,
            requirement: self.requirement,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "emarve=debug" } else { "emarve=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> CliResult {
    if let Command::MockServer { port } = cli.command {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        emarve::mock::serve(addr).await?;
        return Ok(());
    }

    let mut config = ClientConfig::new_from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(path) = cli.session_file {
        config.session_path = path;
    }
    debug!("using backend {} and session {}", config.api_base_url, config.session_path.display());

    let api: Arc<dyn CourseApi> = Arc::new(HttpCourseApi::new(&config)?);
    let session = Session::new(Arc::new(FileStore::open(&config.session_path)?));
    let ctx = PageContext::new(api.clone(), session.clone());
    let auth = AuthService::new(api, session.clone());

    match cli.command {
        Command::Login { email, password } => {
            let route = LoginForm { email, password }.submit(&auth).await?;
            println!("Sesión iniciada. Ir a {}", route);
        }
        Command::Logout => {
            let route = auth.logout()?;
            println!("Sesión cerrada. Ir a {}", route);
        }
        Command::Register { nickname, email, password, instructor } => {
            let form = RegisterForm {
                nickname,
                email,
                password,
                is_instructor: instructor,
            };
            let route = form.submit(&auth).await?;
            println!("Cuenta creada. Ir a {}", route);
        }
        Command::Home { search } => {
            let mut page = CatalogPage::home(ctx).await;
            if let Some(query) = search {
                page.search(&query).await;
            }
            print!("{}", page.render());
        }
        Command::MyCourses => {
            let page = CatalogPage::my_courses(ctx).await;
            print!("{}", page.render());
        }
        Command::Subscribe { course_id } => {
            let page = CatalogPage::home(ctx).await;
            let outcome = page.subscribe(course_id).await?;
            if let Some(alert) = outcome.alert() {
                println!("{}", alert);
            }
        }
        Command::Course { action } => run_course(action, ctx, &session).await?,
        Command::MockServer { .. } => {}
    }

    Ok(())
}

async fn run_course(action: CourseCommand, ctx: PageContext, session: &Session) -> CliResult {
    match action {
        CourseCommand::Show { id } => {
            if let Some(id) = id {
                session.set_course_id(id)?;
            }
            let page = CourseDetailsPage::mount(ctx).await;
            print!("{}", page.render());
        }
        CourseCommand::Comment { text } => {
            let mut page = CourseDetailsPage::mount(ctx).await;
            page.add_comment(&text).await?;
            print!("{}", page.render());
        }
        CourseCommand::Upload { path } => {
            let file = FileUpload::from_path(&path).await?;
            let mut page = CourseDetailsPage::mount(ctx).await;
            let alert = page.upload(&file).await?;
            println!("{}", alert);
        }
        CourseCommand::Create(fields) => {
            let mut page = CatalogPage::home(ctx).await;
            page.open_create()?;
            page.submit(&fields.into_form()).await?;
            print!("{}", page.render());
        }
        CourseCommand::Update { id, fields } => {
            let mut page = CatalogPage::home(ctx).await;
            page.open_update(id)?;
            page.submit(&fields.into_form()).await?;
            print!("{}", page.render());
        }
        CourseCommand::Delete { id } => {
            let mut page = CatalogPage::home(ctx).await;
            page.delete(id).await?;
            info!("course {} removed", id);
            print!("{}", page.render());
        }
    }
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pathfinder::chips::ChipKind;
use pathfinder::config::Config;
use pathfinder::notice::{Notice, NoticeLevel};
use pathfinder::profile::models::SectionName;
use pathfinder::profile::validation::CertificationDraft;
use pathfinder::profile::SavePolicy;
use pathfinder::render;
use pathfinder::state::AppContext;

#[derive(Parser, Debug)]
#[command(
    name = "pathfinder",
    version,
    about = "Build your career profile and explore personalised recommendations"
)]
struct Cli {
    /// Backend base URL, overrides PATHFINDER_API_BASE
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Session file holding the login token, overrides PATHFINDER_SESSION_FILE
    #[arg(long, global = true)]
    session_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in
    Register {
        #[arg(long)]
        fullname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with a Google ID token
    GoogleLogin { credential: String },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show the profile, its completion and which sections are locked
    Show,
    /// Save one section from a JSON object
    SaveSection {
        /// Section key, e.g. basicInfo, skills, workenvironment
        section: String,
        /// Section payload as a JSON object
        #[arg(long)]
        data: String,
        /// Fetch, merge locally and save the whole profile
        #[arg(long, default_value_t = false)]
        merge: bool,
        /// Unlock already-saved sections first
        #[arg(long, default_value_t = false)]
        edit: bool,
    },
    /// Append a certification and save the certifications section
    AddCertification {
        #[arg(long)]
        name: String,
        #[arg(long)]
        org: String,
        /// YYYY-MM-DD
        #[arg(long)]
        issue_date: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        expiry_date: String,
        #[arg(long, default_value = "")]
        id: String,
        #[arg(long, default_value = "")]
        file_name: String,
        #[arg(long, default_value_t = false)]
        edit: bool,
    },
    /// Save every section at once and lock the profile
    Finalize,
    /// Look up suggestions for skills, interests, strengths or weaknesses
    Search { kind: String, query: String },
    /// Rank careers for the stored profile
    Recommend,
    /// Show the personalised roadmap for a career
    Roadmap { career: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_base) = cli.api_base.clone() {
        config.api_base = api_base;
    }
    if let Some(session_file) = cli.session_file.clone() {
        config.session_file = session_file;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Pathfinder v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_base
    );

    let ctx = AppContext::new(config)?;
    run(cli.command, &ctx).await
}

async fn run(command: Command, ctx: &AppContext) -> Result<()> {
    match command {
        Command::Register {
            fullname,
            email,
            password,
        } => {
            let mut auth = ctx.auth();
            let result = auth.register(&fullname, &email, &password).await;
            print_notices(auth.drain_notices());
            result?;
        }
        Command::Login { email, password } => {
            let mut auth = ctx.auth();
            let result = auth.login(&email, &password).await;
            print_notices(auth.drain_notices());
            result?;
        }
        Command::GoogleLogin { credential } => {
            let mut auth = ctx.auth();
            let result = auth.google_login(&credential).await;
            print_notices(auth.drain_notices());
            result?;
        }
        Command::Logout => {
            let mut auth = ctx.auth();
            let result = auth.logout();
            print_notices(auth.drain_notices());
            result?;
        }
        Command::Whoami => {
            println!("{}", render::user(ctx.auth().current_user().as_ref()));
        }
        Command::Show => {
            let mut editor = ctx.editor();
            let result = editor.load_profile().await;
            print_notices(editor.drain_notices());
            result?;
            print!("{}", render::profile(&editor));
        }
        Command::SaveSection {
            section,
            data,
            merge,
            edit,
        } => {
            let section: SectionName = section.parse()?;
            let data: serde_json::Value =
                serde_json::from_str(&data).context("--data must be a JSON object")?;
            let policy = if merge {
                SavePolicy::Merge
            } else {
                ctx.config.save_policy
            };

            let mut editor = ctx.editor();
            let result = async {
                editor.load_profile().await?;
                if edit {
                    editor.enter_edit_mode();
                }
                editor.save_section_with(section, data, policy).await
            }
            .await;
            print_notices(editor.drain_notices());
            result?;
            print!("{}", render::controls(&editor.controls()));
        }
        Command::AddCertification {
            name,
            org,
            issue_date,
            expiry_date,
            id,
            file_name,
            edit,
        } => {
            let draft = CertificationDraft {
                name,
                org,
                issue_date,
                expiry_date,
                id,
                file_name,
            };
            let mut editor = ctx.editor();
            let result = async {
                editor.load_profile().await?;
                if edit {
                    editor.enter_edit_mode();
                }
                editor.add_certification(&draft)?;
                editor.save_form_section(SectionName::Certifications).await
            }
            .await;
            print_notices(editor.drain_notices());
            result?;
        }
        Command::Finalize => {
            let mut editor = ctx.editor();
            let result = async {
                editor.load_profile().await?;
                editor.enter_edit_mode();
                editor.finalize().await
            }
            .await;
            print_notices(editor.drain_notices());
            result?;
            print!("{}", render::controls(&editor.controls()));
        }
        Command::Search { kind, query } => {
            let kind: ChipKind = kind.parse()?;
            let mut editor = ctx.editor();
            let result = editor.init().await;
            print_notices(editor.drain_notices());
            result?;
            let shown = match editor.suggest(kind, &query) {
                Some(pending) => pending.resolve().await.unwrap_or_default(),
                None => Vec::new(),
            };
            println!("{}", render::suggestions(&shown));
        }
        Command::Recommend => {
            let mut view = ctx.recommendations();
            let result = view.run_recommendations().await.map(render::cards);
            print_notices(view.drain_notices());
            print!("{}", result?);
        }
        Command::Roadmap { career } => {
            let mut view = ctx.recommendations();
            view.load_user_profile().await;
            let result = view.handle_roadmap_click(&career).await.map(render::roadmap);
            print_notices(view.drain_notices());
            print!("{}", result?);
        }
    }
    Ok(())
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => println!("{notice}"),
            NoticeLevel::Warning | NoticeLevel::Danger => eprintln!("{notice}"),
        }
    }
}

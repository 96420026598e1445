use api_shared::{ListFilesRes, ListProjectsRes};
use clap::{Args, Parser, Subcommand};
use contented_core::{
    config::restricted_projects_from_env_value, Caller, CoreConfig, FileDeliveryService,
    ProjectId, ProjectListingService, ResultPath, DEFAULT_LOGIN_URL, DEFAULT_PROJECTS_DIR,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "contented")]
#[command(about = "Browse a contented project collection from the terminal")]
struct Cli {
    #[command(flatten)]
    collection: CollectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CollectionArgs {
    /// Collection root containing one directory per project
    #[arg(long, env = "PROJECTS_DIR", default_value = DEFAULT_PROJECTS_DIR)]
    projects_dir: PathBuf,

    /// Comma-separated project ids that require authentication
    #[arg(long, env = "RESTRICTED_PROJECTS")]
    restricted: Option<String>,

    /// Act as an authenticated caller
    #[arg(long, global = true)]
    authenticated: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the projects visible to the caller
    Projects {
        /// Print JSON instead of one id per line
        #[arg(long)]
        json: bool,
    },
    /// List the result files of a project
    Files {
        /// Project id
        project_id: String,
        /// Print JSON instead of one path per line
        #[arg(long)]
        json: bool,
    },
    /// Write a result file to stdout
    Show {
        /// Project id
        project_id: String,
        /// Path relative to the project directory, e.g. my_subfolder/def.tsv
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let restricted = restricted_projects_from_env_value(cli.collection.restricted)?;
    let cfg = Arc::new(CoreConfig::new(
        cli.collection.projects_dir,
        restricted,
        DEFAULT_LOGIN_URL.into(),
    )?);
    let caller = Caller::from_flag(cli.collection.authenticated);

    match cli.command {
        Commands::Projects { json } => {
            let projects = ProjectListingService::new(cfg).list_accessible_projects(caller)?;
            if json {
                let res = ListProjectsRes {
                    projects: projects.iter().map(ToString::to_string).collect(),
                };
                serde_json::to_writer_pretty(&mut *out, &res)?;
                writeln!(out)?;
            } else if projects.is_empty() {
                writeln!(out, "No projects found.")?;
            } else {
                for project in projects {
                    writeln!(out, "{}", project)?;
                }
            }
        }
        Commands::Files { project_id, json } => {
            let project_id = ProjectId::new(&project_id)?;
            let files = ProjectListingService::new(cfg).list_project_files(&project_id, caller)?;
            if json {
                let res = ListFilesRes {
                    project_id: project_id.to_string(),
                    files: files.iter().map(ToString::to_string).collect(),
                };
                serde_json::to_writer_pretty(&mut *out, &res)?;
                writeln!(out)?;
            } else {
                for file in files {
                    writeln!(out, "{}", file)?;
                }
            }
        }
        Commands::Show { project_id, path } => {
            let project_id = ProjectId::new(&project_id)?;
            let path = ResultPath::new(&path)?;
            let delivery = FileDeliveryService::new(cfg).deliver(&project_id, &path, caller)?;
            out.write_all(&delivery.payload.into_bytes()?)?;
        }
    }

    Ok(())
}

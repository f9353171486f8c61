use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use rostra_data::{
    Datastore, ProjectionTarget, Projector, ProjectorElement, SlideRegistry,
};
use rostra_projector::client::ProjectorApi;
use rostra_projector::config::ControlConfig;
use rostra_projector::coordinator::ProjectorCoordinator;

#[derive(Parser)]
#[command(name = "rostra-projector", about = "Controls assembly projectors over the REST API")]
struct Cli {
    /// Path to config file (default: ~/.config/rostra/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show all projectors and their element lists
    Status,
    /// Put a slide on a projector
    Project {
        projector: u64,
        /// Slide name, e.g. "motions/motion"
        name: String,
        /// Id of the record behind the slide
        #[arg(long)]
        id: Option<u64>,
        /// Keep the element across slide navigation
        #[arg(long)]
        stable: bool,
    },
    /// Take a slide off a projector
    Remove {
        projector: u64,
        name: String,
        #[arg(long)]
        id: Option<u64>,
        #[arg(long)]
        stable: bool,
    },
    /// Advance to the first queued preview slide
    Next { projector: u64 },
    /// Recall the last slide from the history
    Previous { projector: u64 },
    /// Project the preview element at the given queue position
    Preview { projector: u64, index: usize },
    /// Append a slide to the preview queue
    Queue {
        projector: u64,
        name: String,
        #[arg(long)]
        id: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ControlConfig::load(cli.config.as_ref())?;
    info!(url = %config.server_url, "loaded config");

    let mut api = ProjectorApi::new(&config.server_url);
    if let Some(token) = &config.access_token {
        api = api.with_access_token(token);
    }

    // Seed the datastore with the server's current records; every mutation
    // below is advisory until the next sync.
    let store = Datastore::new();
    for projector in api.list_projectors().await? {
        store.apply_projector(projector);
    }
    info!(count = store.get_projectors().len(), "fetched projectors");

    let coordinator =
        ProjectorCoordinator::new(Arc::clone(&store), api, SlideRegistry::default());

    match cli.command {
        Command::Status => {
            for projector in store.get_projectors() {
                print_projector(&projector);
            }
        }
        Command::Project {
            projector,
            name,
            id,
            stable,
        } => {
            let target = ProjectionTarget::Element(ProjectorElement { name, id, stable });
            coordinator.project_on(projector, &target).await?;
        }
        Command::Remove {
            projector,
            name,
            id,
            stable,
        } => {
            let target = ProjectionTarget::Element(ProjectorElement { name, id, stable });
            coordinator.remove_from(projector, &target).await?;
        }
        Command::Next { projector } => {
            coordinator.project_next_slide(projector).await?;
        }
        Command::Previous { projector } => {
            coordinator.project_previous_slide(projector).await?;
        }
        Command::Preview { projector, index } => {
            coordinator.project_preview_slide(projector, index).await?;
        }
        Command::Queue { projector, name, id } => {
            coordinator
                .add_element_to_preview(
                    projector,
                    ProjectorElement {
                        name,
                        id,
                        stable: false,
                    },
                )
                .await?;
        }
    }

    Ok(())
}

fn print_projector(projector: &Projector) {
    println!(
        "#{} {} ({}x{})",
        projector.id, projector.name, projector.width, projector.height
    );
    for element in &projector.elements {
        println!("  live     {}", format_element(element));
    }
    for element in &projector.elements_preview {
        println!("  preview  {}", format_element(element));
    }
    println!("  history  {} frame(s)", projector.elements_history.len());
}

fn format_element(element: &ProjectorElement) -> String {
    let mut line = element.name.clone();
    if let Some(id) = element.id {
        line.push_str(&format!(" #{id}"));
    }
    if element.stable {
        line.push_str(" [stable]");
    }
    line
}

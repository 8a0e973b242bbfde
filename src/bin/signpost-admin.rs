use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use signpost::analytics::models::event_name;
use signpost::config::Config;
use signpost::models::ROOT_GROUP;
use signpost::redirect::RedirectResolver;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signpost-admin")]
#[command(about = "Signpost redirect table tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the redirect table
    Check {
        /// Redirect table to check (defaults to REDIRECT_CONFIG_FILE)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show where a request would be redirected
    Resolve {
        /// Redirect group, as it appears in the request path
        group: String,
        /// User-Agent header to classify
        #[arg(long, default_value = "")]
        user_agent: String,
        /// Redirect table to use (defaults to REDIRECT_CONFIG_FILE)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let resolver_for = |file: Option<PathBuf>| {
        RedirectResolver::new(file.unwrap_or_else(|| config.resolver.config_file.clone()))
    };

    match cli.command {
        Commands::Check { file } => {
            let resolver = resolver_for(file);
            let table = resolver.load().await?;

            if !table.contains(ROOT_GROUP) {
                bail!(
                    "{}: fallback group '{}' is missing",
                    resolver.config_file().display(),
                    ROOT_GROUP
                );
            }

            let malformed = table.malformed();
            let missing = table.unresolvable();
            let root_broken = malformed.contains(&ROOT_GROUP)
                || missing.iter().any(|(group, _)| *group == ROOT_GROUP);

            for group in &malformed {
                println!("⚠ group '{}' is not a mapping of device to URL", group);
            }

            for (group, device) in &missing {
                println!("⚠ group '{}' has no destination for {}", group, device);
            }

            if root_broken {
                bail!(
                    "{}: group '{}' must resolve for every device class",
                    resolver.config_file().display(),
                    ROOT_GROUP
                );
            }

            println!(
                "✓ {} OK ({} groups)",
                resolver.config_file().display(),
                table.groups.len()
            );
        }
        Commands::Resolve {
            group,
            user_agent,
            file,
        } => {
            let resolution = resolver_for(file).resolve(&group, &user_agent).await?;

            println!("{:<16} {}", "Destination", resolution.destination);
            println!("{:<16} {}", "Group", resolution.group);
            println!("{:<16} {}", "Device", resolution.device);
            println!("{:<16} {}", "Fallback", resolution.fallback_used());
            println!("{:<16} {}", "Event", event_name(&resolution));
            if let Some(requested) = &resolution.requested_group {
                println!("{:<16} {}", "Requested", requested);
            }
        }
    }

    Ok(())
}

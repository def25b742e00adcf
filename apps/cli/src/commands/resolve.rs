//! `extcat resolve`
//!
//! Resolves a location exactly as the runtime site does, so a link can be
//! checked before it is published.

use anyhow::{bail, Result};
use std::sync::Arc;

use extcat_core::{
    CatalogFetcher, ExtensionAction, NavigationOutcome, ResolverState, RuntimeResolver, SiteConfig,
};

pub async fn run(config: SiteConfig, location: &str, json: bool) -> Result<()> {
    let fetcher = Arc::new(CatalogFetcher::new(&config)?);
    let resolver = RuntimeResolver::new(fetcher, config.layout());

    let state = match resolver.navigate(location).await {
        NavigationOutcome::Applied(state) => state,
        NavigationOutcome::Superseded { navigation } => {
            bail!("Navigation {} was superseded", navigation)
        }
    };

    match state {
        ResolverState::Found { descriptor, .. } => {
            if json {
                return super::print_json(&descriptor);
            }
            println!("{} ({})", descriptor.name, descriptor.id);
            println!("{}", descriptor.description);
            println!("Source: {}", descriptor.link);
            match ExtensionAction::for_descriptor(&descriptor) {
                ExtensionAction::InstallCommand {
                    command,
                    installation_notes,
                } => {
                    println!("Install: {}", command);
                    if let Some(notes) = installation_notes {
                        println!("Notes: {}", notes);
                    }
                }
                ExtensionAction::BuiltinNotice => println!("Built-in extension"),
                ExtensionAction::ViewSource { .. } => {}
            }
            if !descriptor.environment_variables.is_empty() {
                println!(
                    "Environment ({} required):",
                    descriptor.required_env_count()
                );
            }
            for var in &descriptor.environment_variables {
                let marker = if var.required { " (required)" } else { "" };
                println!("  {}{}: {}", var.name, marker, var.description);
            }
            Ok(())
        }
        ResolverState::NotFound { key, .. } => bail!("No extension matches '{}'", key),
        ResolverState::FetchFailed { message, .. } => bail!("Failed to load catalog: {}", message),
        ResolverState::Idle | ResolverState::Loading { .. } => {
            bail!("Resolution did not settle for {}", location)
        }
    }
}

//! `extcat list`

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashSet;

use extcat_core::{ExtensionAction, ExtensionDescriptor, SiteBuilder, SiteConfig, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sort {
    /// Upstream catalog order
    Catalog,
    /// Most GitHub stars first
    Stars,
    /// Alphabetical
    Name,
}

impl From<Sort> for SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Catalog => SortOrder::Catalog,
            Sort::Stars => SortOrder::StarsDesc,
            Sort::Name => SortOrder::NameAsc,
        }
    }
}

#[derive(Serialize)]
struct ListItem<'a> {
    #[serde(flatten)]
    descriptor: &'a ExtensionDescriptor,
    action: ExtensionAction,
    required_env: usize,
}

pub async fn run(config: SiteConfig, search: Option<&str>, sort: Sort, json: bool) -> Result<()> {
    let snapshot = SiteBuilder::new(config)?.load_snapshot().await?;

    let mut matching = snapshot.sorted(sort.into());
    if let Some(query) = search {
        let hits: HashSet<&str> = snapshot
            .search(query)
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        matching.retain(|d| hits.contains(d.id.as_str()));
    }

    if json {
        let items: Vec<ListItem> = matching
            .iter()
            .map(|d| ListItem {
                descriptor: *d,
                action: ExtensionAction::for_descriptor(d),
                required_env: d.required_env_count(),
            })
            .collect();
        return super::print_json(&items);
    }

    for d in &matching {
        println!(
            "{:<32} {:>7}  {:<10} {:>3}  {}",
            d.id,
            d.github_stars,
            action_label(&ExtensionAction::for_descriptor(d)),
            d.required_env_count(),
            d.name
        );
    }
    println!("{} of {} extensions", matching.len(), snapshot.len());
    Ok(())
}

fn action_label(action: &ExtensionAction) -> &'static str {
    match action {
        ExtensionAction::InstallCommand { .. } => "install",
        ExtensionAction::BuiltinNotice => "built-in",
        ExtensionAction::ViewSource { .. } => "source",
    }
}

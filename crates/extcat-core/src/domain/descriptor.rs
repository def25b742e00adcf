use serde::{Deserialize, Serialize};

/// A normalized catalog entry (one extension / MCP server).
///
/// Field order is the serialization order; exported data files depend on it
/// being stable. Field names follow the upstream catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    /// Content-derived, URL-safe identifier (e.g., "github-mcp")
    pub id: String,

    /// Display name
    pub name: String,

    /// Display description
    pub description: String,

    /// Install command, present when the extension is externally installable
    pub command: Option<String>,

    /// Built-in extensions show a notice instead of install affordances
    #[serde(default)]
    pub is_builtin: bool,

    /// Upstream repository / source URL
    pub link: String,

    /// Popularity signal
    #[serde(rename = "githubStars", default)]
    pub github_stars: u64,

    /// Shown alongside the install command
    pub installation_notes: Option<String>,

    /// Environment variables the extension reads, in catalog order
    #[serde(rename = "environmentVariables", default)]
    pub environment_variables: Vec<EnvironmentVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl ExtensionDescriptor {
    /// Number of environment variables that must be set before use
    pub fn required_env_count(&self) -> usize {
        self.environment_variables
            .iter()
            .filter(|v| v.required)
            .count()
    }

    /// Case-insensitive match against id, name and description
    pub fn matches(&self, query_lower: &str) -> bool {
        self.id.contains(query_lower)
            || self.name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
    }
}

/// What a detail or listing page offers for a descriptor.
///
/// Consumers resolve this by exhaustive match; there is no "is this renderable"
/// check at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtensionAction {
    /// Installable via a command line; the installer link is built downstream
    InstallCommand {
        command: String,
        installation_notes: Option<String>,
    },
    /// Ships with the host; show a "built-in" indicator
    BuiltinNotice,
    /// Neither built-in nor installable; point at the upstream source
    ViewSource { link: String },
}

impl ExtensionAction {
    /// Built-in wins over a command so the install button is never shown for it.
    pub fn for_descriptor(descriptor: &ExtensionDescriptor) -> Self {
        if descriptor.is_builtin {
            return ExtensionAction::BuiltinNotice;
        }
        match &descriptor.command {
            Some(command) => ExtensionAction::InstallCommand {
                command: command.clone(),
                installation_notes: descriptor.installation_notes.clone(),
            },
            None => ExtensionAction::ViewSource {
                link: descriptor.link.clone(),
            },
        }
    }
}

//! CLI Tooling
//!
//! Command-line access to the tree engine: partition an exported node list,
//! inspect the offline snapshot, and compute action menu placement.

use crate::config::SidebarConfig;
use crate::error::{ApiError, StorageError};
use crate::menu::{MenuPositioner, MenuSize, Rect, Viewport};
use crate::reorder::OrderScope;
use crate::sections::{partition, PartitionContext};
use crate::store::persistence::default_snapshot_path;
use crate::store::{OfflineSnapshot, SledSnapshotStore};
use crate::tooling::format::{
    format_order_text, format_placement_text, format_roots_text, format_sections_text,
};
use crate::tree::node::{Node, WorkArea};
use crate::types::{NodeId, WorkAreaId};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Canopy CLI - page sidebar tree engine
#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Inspect page sidebar sections, offline snapshots, and menu placement")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Partition a node list into sidebar sections
    Sections {
        /// JSON array of nodes as listed by the page service
        #[arg(long)]
        nodes: PathBuf,
        /// Email of the viewing user
        #[arg(long)]
        user: String,
        /// JSON array of work areas the user belongs to
        #[arg(long)]
        work_areas: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Inspect the offline snapshot
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
    /// Compute where an action menu opens
    Place {
        /// Trigger rectangle as left,top,width,height
        #[arg(long, value_parser = parse_rect)]
        trigger: Rect,
        /// Menu size as width,height (defaults from config)
        #[arg(long, value_parser = parse_pair)]
        menu: Option<(f32, f32)>,
        /// Viewport size as width,height
        #[arg(long, value_parser = parse_pair)]
        viewport: (f32, f32),
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// List the root pages stored for offline start
    Roots {
        /// Snapshot directory (defaults to config, then the platform data dir)
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the stored sibling order for the root list or one parent
    Order {
        /// Parent page id; omit for the root list
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Parse `a,b` into two floats.
pub fn parse_pair(raw: &str) -> Result<(f32, f32), String> {
    match parse_floats(raw)?.as_slice() {
        [a, b] => Ok((*a, *b)),
        other => Err(format!("expected 2 comma-separated numbers, got {}", other.len())),
    }
}

/// Parse `left,top,width,height` into a [`Rect`].
pub fn parse_rect(raw: &str) -> Result<Rect, String> {
    match parse_floats(raw)?.as_slice() {
        [left, top, width, height] => Ok(Rect::new(*left, *top, *width, *height)),
        other => Err(format!("expected 4 comma-separated numbers, got {}", other.len())),
    }
}

fn parse_floats(raw: &str) -> Result<Vec<f32>, String> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid number {:?}: {}", part.trim(), e))
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let raw = std::fs::read_to_string(path).map_err(StorageError::from)?;
    serde_json::from_str(&raw)
        .map_err(|e| ApiError::InvalidInput(format!("{}: {}", path.display(), e)))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::InvalidInput(e.to_string()))
}

/// CLI context: resolved configuration shared by every command.
pub struct CliContext {
    config: SidebarConfig,
}

impl CliContext {
    pub fn new(config: SidebarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SidebarConfig {
        &self.config
    }

    /// Execute a CLI command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Sections {
                nodes,
                user,
                work_areas,
                format,
            } => self.sections(nodes, user, work_areas.as_deref(), format),
            Commands::Snapshot { command } => self.snapshot(command),
            Commands::Place {
                trigger,
                menu,
                viewport,
                format,
            } => self.place(*trigger, *menu, *viewport, format),
        }
    }

    fn sections(
        &self,
        nodes_path: &Path,
        user: &str,
        work_areas_path: Option<&Path>,
        format: &str,
    ) -> Result<String, ApiError> {
        let nodes: Vec<Node> = read_json(nodes_path)?;
        let work_areas: Vec<WorkArea> = match work_areas_path {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };
        let ids: HashSet<WorkAreaId> = work_areas.into_iter().map(|w| w.id).collect();
        let sections = partition(&nodes, &PartitionContext::new(user, &ids));
        info!(
            nodes = nodes.len(),
            classified = sections.classified_len(),
            unclassified = sections.unclassified.len(),
            "Partitioned node list"
        );
        match format {
            "json" => to_json(&sections),
            _ => Ok(format_sections_text(&sections)),
        }
    }

    fn open_snapshot(&self, store: Option<&Path>) -> Result<(PathBuf, OfflineSnapshot), ApiError> {
        let path = match (store, &self.config.snapshot.path) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => path.clone(),
            (None, None) => default_snapshot_path()?,
        };
        let backend = SledSnapshotStore::open(&path)?;
        Ok((path, OfflineSnapshot::new(Arc::new(backend))))
    }

    fn snapshot(&self, command: &SnapshotCommands) -> Result<String, ApiError> {
        match command {
            SnapshotCommands::Roots { store, format } => {
                let (path, snapshot) = self.open_snapshot(store.as_deref())?;
                let Some(nodes) = snapshot.load_root_nodes()? else {
                    return Ok(format!("No root pages stored in {}\n", path.display()));
                };
                match format.as_str() {
                    "json" => to_json(&nodes),
                    _ => Ok(format_roots_text(&nodes)),
                }
            }
            SnapshotCommands::Order {
                parent,
                store,
                format,
            } => {
                let (path, snapshot) = self.open_snapshot(store.as_deref())?;
                let (label, stored) = match parent {
                    Some(id) => {
                        let scope = OrderScope::Parent(NodeId::new(id.as_str()));
                        (scope.to_string(), snapshot.load_order(&scope)?)
                    }
                    None => ("root pages".to_string(), snapshot.load_root_order()?),
                };
                let Some(ids) = stored else {
                    return Ok(format!("No order stored for {} in {}\n", label, path.display()));
                };
                match format.as_str() {
                    "json" => to_json(&ids),
                    _ => Ok(format_order_text(&label, &ids)),
                }
            }
        }
    }

    fn place(
        &self,
        trigger: Rect,
        menu: Option<(f32, f32)>,
        viewport: (f32, f32),
        format: &str,
    ) -> Result<String, ApiError> {
        let (width, height) = menu.unwrap_or((self.config.menu.default_width, self.config.menu.default_height));
        let placement = MenuPositioner::from_config(&self.config.menu).place(
            trigger,
            MenuSize { width, height },
            Viewport {
                width: viewport.0,
                height: viewport.1,
            },
        );
        match format {
            "json" => to_json(&placement),
            _ => Ok(format_placement_text(&placement)),
        }
    }
}

//! Graphviz rendering of the inheritance graph

use crate::registry::ReleaseConfigs;
use crate::{ROOT_RELEASE_CONFIG, Result};
use rc_flags::ReleaseConfigType;
use rc_fs::{NormalizedPath, io};
use std::collections::BTreeSet;

const HEADER: [&str; 3] = [
    "digraph {",
    "graph [ ratio=.5 ];",
    "node [ shape=box, style=filled, fillcolor=white, colorscheme=svg, color=black ];",
];

/// Render the inheritance graph in dot format.
///
/// Edges point from a config to what it inherits. The implicit `root`
/// parent is left out. Aliases that are inherited through get a dashed edge
/// to their target; prior stages get a dotted edge.
pub fn render_inheritance_graph(configs: &ReleaseConfigs) -> String {
    let mut lines = BTreeSet::new();
    let mut used_aliases = BTreeSet::new();

    for config in configs.release_configs() {
        if config.name == ROOT_RELEASE_CONFIG {
            continue;
        }
        for inherit in &config.inherit_names {
            if inherit == ROOT_RELEASE_CONFIG {
                continue;
            }
            lines.insert(format!("\"{}\" -> \"{}\"", config.name, inherit));
            if configs.aliases().contains_key(inherit) {
                used_aliases.insert(inherit.as_str());
            }
        }
        for stage in config.prior_stages() {
            lines.insert(format!(
                "\"{}\" -> \"{}\" [ style=dotted, color=\"#ffad99\" ]",
                config.name, stage
            ));
        }

        let fill = match config.release_config_type {
            ReleaseConfigType::BuildVariant => "#d9d9d9",
            ReleaseConfigType::ExplicitInheritanceConfig => "#ffffcc",
            _ if config.disallow_lunch_use => "#ffcccc",
            _ => "white",
        };
        let label = if config.other_names.is_empty() {
            config.name.clone()
        } else {
            format!("{}\\n{}", config.name, config.other_names.join(" "))
        };
        lines.insert(format!(
            "\"{}\" [ label=\"{}\", fillcolor=\"{}\" ]",
            config.name, label, fill
        ));
    }

    for alias in used_aliases {
        if let Some(target) = configs.aliases().get(alias) {
            lines.insert(format!("\"{alias}\" -> \"{target}\" [ style=dashed ]"));
        }
    }

    let mut data: Vec<String> = HEADER.iter().map(|l| l.to_string()).collect();
    data.extend(lines);
    data.push("}".to_string());
    let mut rendered = data.join("\n");
    rendered.push('\n');
    rendered
}

/// Render and atomically write the inheritance graph to `path`.
pub fn write_inheritance_graph(configs: &ReleaseConfigs, path: &NormalizedPath) -> Result<()> {
    io::write_atomic(path, render_inheritance_graph(configs).as_bytes())?;
    tracing::info!(path = %path, "Wrote inheritance graph");
    Ok(())
}

//! Format sections, snapshot contents, and menu placement as text.

use crate::menu::Placement;
use crate::sections::{Sections, PRECEDENCE};
use crate::tree::node::Node;
use crate::types::NodeId;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn node_table(nodes: &[Node]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Title", "Owner", "Work area"]);
    for node in nodes {
        table.add_row(vec![
            node.id.to_string(),
            if node.title.is_empty() { "-".to_string() } else { node.title.clone() },
            node.owner_email.clone(),
            node.work_area_id
                .as_ref()
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

/// One table per non-empty section, in precedence order, then unclassified ids.
pub fn format_sections_text(sections: &Sections) -> String {
    let mut out = String::new();
    for section in PRECEDENCE.iter().map(|(section, _)| *section) {
        let nodes = sections.bucket(section);
        if nodes.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "{} ({})\n",
            format_section_heading(section.label()),
            nodes.len()
        ));
        out.push_str(&format!("{}\n\n", node_table(nodes)));
    }
    if sections.classified_len() == 0 {
        out.push_str("No pages in any section.\n");
    }
    if !sections.unclassified.is_empty() {
        let ids: Vec<String> = sections.unclassified.iter().map(NodeId::to_string).collect();
        out.push_str(&format!(
            "{} {}\n",
            "Unclassified:".yellow(),
            ids.join(", ")
        ));
    }
    out
}

pub fn format_roots_text(nodes: &[Node]) -> String {
    format!(
        "{}\n\n{}\n",
        format_section_heading("Offline root pages"),
        node_table(nodes)
    )
}

pub fn format_order_text(label: &str, ids: &[NodeId]) -> String {
    let mut out = format!("{}\n", format_section_heading(&format!("Order: {}", label)));
    for (index, id) in ids.iter().enumerate() {
        out.push_str(&format!("  {:>3}  {}\n", index, id));
    }
    out
}

pub fn format_placement_text(placement: &Placement) -> String {
    let side = if placement.flipped {
        "above trigger".cyan().to_string()
    } else {
        "below trigger".green().to_string()
    };
    format!(
        "top: {:.1}\nleft: {:.1}\nplacement: {}\n",
        placement.top, placement.left, side
    )
}

//! `legend: auto` support: one entry per fill color used by the script.

use indexmap::IndexMap;
use serde::Serialize;

use super::ast::{Command, Script};
use crate::model::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    /// Resolved hex color.
    pub color: String,
}

/// Group the `country`/`region` fills of `script` by resolved color, first-seen order.
pub fn auto_entries(script: &Script, config: &Config) -> Vec<LegendEntry> {
    let mut groups: IndexMap<String, Vec<&str>> = IndexMap::new();

    for cmd in script.commands() {
        let (name, token) = match cmd {
            Command::Country { name, color, .. } | Command::Region { name, color, .. } => {
                (name.as_str(), color.as_str())
            }
            _ => continue,
        };
        let names = groups.entry(config.resolve_color(Some(token))).or_default();
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name);
        }
    }

    groups
        .into_iter()
        .map(|(color, names)| LegendEntry {
            label: names.join(", "),
            color,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::script_parser::parse;

    #[test]
    fn test_groups_by_color() {
        let script = parse(
            "armenia: orange\n\
             azerbaijan: blue\n\
             region: Artsakh, Azerbaijan, orange, occupied\n\
             Armenia: orange, pulse\n\
             bubble: 1, 2, \"ignored\", red",
        );
        let entries = auto_entries(&script, &Config::default());
        assert_eq!(
            entries,
            vec![
                LegendEntry {
                    label: "armenia, Artsakh".into(),
                    color: "#ffa502".into(),
                },
                LegendEntry {
                    label: "azerbaijan".into(),
                    color: "#3742fa".into(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_script() {
        assert!(auto_entries(&Script::new(), &Config::default()).is_empty());
    }
}

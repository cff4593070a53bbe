//! Help pages listing key bindings
//!
//! A [`HelpPage`] is plain data; hosts decide how to show it. `Display`
//! renders it as aligned plain-text tables.

use std::fmt;

use super::mode::Mode;
use super::store::KeyMapStore;
use super::trie::{self, NodeRef};
use super::types::{join_tokens, Token};
use crate::config::KeyHandlerConfig;

/// One titled table of a help page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable {
    pub title: String,
    /// Stable identifier, e.g. the mode name
    pub anchor: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Paragraph shown under the title
    pub note: Option<String>,
}

impl BindingTable {
    fn new(title: impl Into<String>, anchor: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            anchor: anchor.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            note: None,
        }
    }

    /// A `Key | Binding` table of every leaf below `node`
    ///
    /// Key cells carry the full sequence, `prefix` included.
    fn from_node(title: String, anchor: &str, node: &NodeRef, prefix: &[Token]) -> Self {
        let mut table = Self::new(title, anchor, &["Key", "Binding"]);
        let mut keys = prefix.to_vec();
        trie::for_each_leaf(node, &mut keys, &mut |seq, action| {
            table
                .rows
                .push(vec![join_tokens(seq), action.label().to_string()]);
        });
        table
    }

    /// First cell of every row
    pub fn keys(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().map(String::as_str))
            .collect()
    }
}

/// A full help page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPage {
    pub title: String,
    pub tables: Vec<BindingTable>,
}

impl HelpPage {
    /// Bindings reachable from `prefix` in every mode
    ///
    /// Modes in which `prefix` does not lead to a prefix node are left out.
    pub fn interactive_help(store: &KeyMapStore, prefix: &[Token]) -> Self {
        let seq = join_tokens(prefix);
        let tables = Mode::ALL
            .iter()
            .filter_map(|&mode| {
                let node = store.trail(mode, prefix)?;
                Some(BindingTable::from_node(
                    format!("{} Bindings Starting With {}", mode.title(), seq),
                    mode.name(),
                    &node,
                    prefix,
                ))
            })
            .collect();

        Self {
            title: format!("Key Bindings Starting With {}", seq),
            tables,
        }
    }

    /// Every binding, plus the special keys and the prefix-argument keys
    pub fn list_key_bindings(store: &KeyMapStore, config: &KeyHandlerConfig) -> Self {
        let special = &config.special_keys;
        let mut tables = Vec::new();

        let mut table = BindingTable::new("Special Keys", "special", &["Role", "Key", "Description"]);
        for (role, key, description) in special.roles() {
            table.rows.push(vec![
                role.to_string(),
                key.map(Token::to_string).unwrap_or_else(|| "Not defined".to_string()),
                description.to_string(),
            ]);
        }
        tables.push(table);

        let mut table = BindingTable::new("Prefix Argument Keys", "parg", &["Key", "Description"]);
        if config.use_prefix_argument {
            table.note = Some("Prefix arguments can be disabled with `use_prefix_argument: false`.".to_string());
            if let Some(univ) = &special.universal_argument {
                table.rows.push(vec![
                    univ.to_string(),
                    format!(
                        "Universal argument: {} alone is 4, {} {} is 16, followed by digits gives that number",
                        univ, univ, univ
                    ),
                ]);
            }
            table
                .rows
                .push(vec!["C-[0-9]".to_string(), "Positive numeric argument".to_string()]);
            for key in special.negative_arguments() {
                table
                    .rows
                    .push(vec![key.to_string(), "Negative numeric argument".to_string()]);
            }
        } else {
            table.note = Some("Prefix arguments are disabled. Set `use_prefix_argument: true` to enable them.".to_string());
        }
        tables.push(table);

        for mode in Mode::ALL {
            tables.push(BindingTable::from_node(
                format!("{} Bindings", mode.title()),
                mode.name(),
                store.root(mode),
                &[],
            ));
        }

        Self {
            title: "All key bindings".to_string(),
            tables,
        }
    }

    pub fn table(&self, anchor: &str) -> Option<&BindingTable> {
        self.tables.iter().find(|t| t.anchor == anchor)
    }
}

impl fmt::Display for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "-".repeat(self.title.chars().count()))?;
        if let Some(note) = &self.note {
            writeln!(f, "{}", note)?;
        }
        if self.rows.is_empty() {
            return Ok(());
        }

        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let last = cells.len().min(columns).saturating_sub(1);
            for (i, cell) in cells.iter().enumerate().take(columns) {
                if i == last {
                    writeln!(f, "{}", cell)?;
                } else {
                    write!(f, "{:<width$}  ", cell, width = widths[i])?;
                }
            }
            Ok(())
        };

        write_row(f, &self.headers[..])?;
        for row in &self.rows {
            write_row(f, &row[..])?;
        }
        Ok(())
    }
}

impl fmt::Display for HelpPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        for table in &self.tables {
            writeln!(f)?;
            write!(f, "{}", table)?;
        }
        Ok(())
    }
}

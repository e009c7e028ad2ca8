//! Terminal rendering for the markdown produced by the core Display wrappers.
//!
//! Rich mode styles output with termimad; plain mode prints the markdown
//! unchanged, which keeps it stable for scripts and tests.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renders markdown either styled or as plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.quote_mark.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(238));
        skin.table.set_fg(Color::AnsiValue(244));

        Self { rich_enabled, skin }
    }

    /// Prints markdown to standard output.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for block in blocks(markdown) {
            match block {
                Block::Table(rows) => self.skin.print_text(&rows),
                // Headers keep their hash marks so plan ids stay readable
                Block::Line(line) if line.starts_with('#') => {
                    println!("\x1b[34m{line}\x1b[0m");
                }
                Block::Line(line) => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[derive(Debug, PartialEq)]
enum Block<'a> {
    Line(&'a str),
    Table(String),
}

/// Groups consecutive table rows so termimad can align their columns.
fn blocks(markdown: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut table = String::new();

    for line in markdown.lines() {
        if line.starts_with('|') {
            table.push_str(line);
            table.push('\n');
            continue;
        }
        if !table.is_empty() {
            blocks.push(Block::Table(std::mem::take(&mut table)));
        }
        blocks.push(Block::Line(line));
    }
    if !table.is_empty() {
        blocks.push(Block::Table(table));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_table_rows_are_grouped() {
        let markdown = "# Steps\n\n| # | Step |\n|---|------|\n| 1 | Context |\nDone\n";
        let blocks = blocks(markdown);

        assert_eq!(
            blocks,
            vec![
                Block::Line("# Steps"),
                Block::Line(""),
                Block::Table("| # | Step |\n|---|------|\n| 1 | Context |\n".to_string()),
                Block::Line("Done"),
            ]
        );
    }

    #[test]
    fn test_trailing_table_is_kept() {
        let blocks = blocks("| a |\n| b |");
        assert_eq!(blocks, vec![Block::Table("| a |\n| b |\n".to_string())]);
    }
}

//! Markdown to styled terminal text.

use colored::{ColoredString, Colorize};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Heading(HeadingLevel),
    Strong,
    Emphasis,
    Strikethrough,
    Link,
}

#[derive(Debug)]
enum ListKind {
    Bullet,
    Ordered(u64),
}

#[derive(Debug, Default)]
struct Renderer {
    out: String,
    styles: Vec<Style>,
    lists: Vec<ListKind>,
    links: Vec<String>,
    in_code_block: bool,
    table_row: Vec<String>,
    in_table_cell: bool,
}

impl Renderer {
    fn styled(&self, text: &str) -> ColoredString {
        let mut styled = text.normal();
        for style in &self.styles {
            styled = match style {
                Style::Heading(HeadingLevel::H1) => styled.bold().cyan().underline(),
                Style::Heading(HeadingLevel::H2) => styled.bold().cyan(),
                Style::Heading(_) => styled.bold(),
                Style::Strong => styled.bold(),
                Style::Emphasis => styled.italic(),
                Style::Strikethrough => styled.strikethrough(),
                Style::Link => styled.blue().underline(),
            };
        }
        styled
    }

    fn push_text(&mut self, text: &str) {
        if self.in_table_cell {
            if let Some(cell) = self.table_row.last_mut() {
                cell.push_str(text);
            }
            return;
        }
        if self.in_code_block {
            for line in text.lines() {
                self.out.push_str(&format!("    {}\n", line.yellow()));
            }
            return;
        }
        let styled = self.styled(text).to_string();
        self.out.push_str(&styled);
    }

    fn block_end(&mut self) {
        if !self.out.ends_with("\n\n") {
            self.out.push_str(if self.out.ends_with('\n') { "\n" } else { "\n\n" });
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.styles.push(Style::Heading(level));
                if !matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
                    self.out.push_str(&"#".repeat(level as usize).dimmed().to_string());
                    self.out.push(' ');
                }
            }
            Tag::Strong => self.styles.push(Style::Strong),
            Tag::Emphasis => self.styles.push(Style::Emphasis),
            Tag::Strikethrough => self.styles.push(Style::Strikethrough),
            Tag::Link { dest_url, .. } => {
                self.styles.push(Style::Link);
                self.links.push(dest_url.to_string());
            }
            Tag::List(start) => {
                if !self.lists.is_empty() && !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.lists.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Bullet,
                });
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let marker = format!("{n}.");
                        *n += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                self.out.push_str(&format!("{indent}{} ", marker.cyan()));
            }
            Tag::CodeBlock(kind) => {
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.out.push_str(&format!("    {}\n", lang.dimmed()));
                    }
                }
            }
            Tag::BlockQuote(_) => self.out.push_str(&"│ ".dimmed().to_string()),
            Tag::TableRow | Tag::TableHead => self.table_row.clear(),
            Tag::TableCell => {
                self.table_row.push(String::new());
                self.in_table_cell = true;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.block_end();
            }
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.links.pop() {
                    self.out.push_str(&format!(" ({})", url.dimmed()));
                }
            }
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.block_end();
                } else {
                    self.out.push('\n');
                }
            }
            TagEnd::Item => {
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.block_end();
                }
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.block_end();
            }
            TagEnd::TableCell => self.in_table_cell = false,
            TagEnd::TableHead => {
                self.push_table_row(true);
            }
            TagEnd::TableRow => self.push_table_row(false),
            TagEnd::Table => self.block_end(),
            _ => {}
        }
    }

    fn push_table_row(&mut self, header: bool) {
        let row = self.table_row.join(" │ ");
        if header {
            self.out.push_str(&format!("{}\n", row.bold()));
            self.out.push_str(&format!("{}\n", "─".repeat(row.chars().count()).dimmed()));
        } else {
            self.out.push_str(&row);
            self.out.push('\n');
        }
        self.table_row.clear();
    }
}

/// Render markdown for a terminal. Headings, emphasis, lists, code, links and
/// tables are styled; anything else passes through as plain text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut renderer = Renderer::default();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => renderer.start(tag),
            Event::End(tag) => renderer.end(tag),
            Event::Text(text) => renderer.push_text(&text),
            Event::Code(code) => {
                let code = code.yellow().to_string();
                if renderer.in_table_cell {
                    renderer.push_text(&code);
                } else {
                    renderer.out.push_str(&code);
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => renderer.out.push_str(&html),
            Event::SoftBreak | Event::HardBreak => renderer.out.push('\n'),
            Event::Rule => {
                renderer.out.push_str(&"─".repeat(40).dimmed().to_string());
                renderer.block_end();
            }
            Event::TaskListMarker(done) => {
                renderer.out.push_str(if done { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    renderer.out.trim_end().to_string() + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(markdown: &str) -> String {
        colored::control::set_override(false);
        render_markdown(markdown)
    }

    #[test]
    fn headings_and_paragraphs_are_separated() {
        let output = plain("# Report\n\nJane is qualified.\n\n### Details\n\nMore.");
        assert_eq!(output, "Report\n\nJane is qualified.\n\n### Details\n\nMore.\n");
    }

    #[test]
    fn lists_use_markers() {
        let output = plain("- one\n- two\n\n1. first\n2. second\n");
        assert!(output.contains("• one\n• two\n"));
        assert!(output.contains("1. first\n2. second\n"));
    }

    #[test]
    fn links_show_their_target() {
        let output = plain("See [profile](https://example.com/jane).");
        assert_eq!(output, "See profile (https://example.com/jane).\n");
    }

    #[test]
    fn tables_render_as_rows() {
        let output = plain("| Name | Score |\n|---|---|\n| Jane | 9 |\n");
        assert!(output.contains("Name │ Score\n"));
        assert!(output.contains("Jane │ 9\n"));
    }
}

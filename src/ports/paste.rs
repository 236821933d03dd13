// src/ports/paste.rs
use std::collections::HashMap;

use crate::constants::{MAX_RENDER_DEPTH, PASTE_HEADER};
use crate::domain::{apply_template, format_tag, Child, DomainError, Note};
use tracing::instrument;

/// Renders notes into the Tana Paste outline format.
#[derive(Debug, Clone)]
pub struct PasteGenerator {
    max_depth: usize,
}

impl PasteGenerator {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_RENDER_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[instrument(level = "debug", skip(self, note), fields(content = %note.content))]
    pub fn generate(&self, note: &Note) -> Result<String, DomainError> {
        if note.content.is_empty() {
            return Err(DomainError::Render("note content must not be empty".to_string()));
        }

        let mut output = String::with_capacity(64);
        output.push_str(PASTE_HEADER);
        output.push('\n');
        self.format_node(&mut output, note, 0)?;
        Ok(output)
    }

    /// Generate each note as its own paste document, separated by a newline.
    pub fn generate_many(&self, notes: &[Note]) -> Result<String, DomainError> {
        let documents = notes
            .iter()
            .map(|note| self.generate(note))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(documents.join("\n"))
    }

    /// Expand a template and render the resulting note.
    pub fn render_template(
        &self,
        content: &str,
        template_name: &str,
        data: &HashMap<String, String>,
    ) -> Result<String, DomainError> {
        let note = apply_template(content, template_name, data)?;
        self.generate(&note)
    }

    fn format_node(&self, out: &mut String, note: &Note, indent: usize) -> Result<(), DomainError> {
        if indent >= self.max_depth {
            return Err(DomainError::Render(format!(
                "note nesting exceeds the maximum depth of {}",
                self.max_depth
            )));
        }

        push_line_start(out, indent);
        out.push_str(&note.content);
        for tag in &note.tags {
            out.push_str(" #");
            out.push_str(&format_tag(tag));
        }
        out.push('\n');

        for field in &note.fields {
            push_line_start(out, indent + 1);
            out.push_str(&format!("{}:: {}\n", field.name, field.value));
        }

        for child in &note.children {
            match child {
                Child::Text(text) => {
                    push_line_start(out, indent + 1);
                    out.push_str(text);
                    out.push('\n');
                }
                Child::Note(inner) => self.format_node(out, inner, indent + 1)?,
            }
        }
        Ok(())
    }
}

impl Default for PasteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn push_line_start(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push_str("- ");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(levels: usize) -> Note {
        let mut note = Note::new(format!("level {}", levels - 1));
        for level in (0..levels - 1).rev() {
            note = Note::new(format!("level {level}")).with_child(note);
        }
        note
    }

    #[test]
    fn given_root_with_text_child_when_generating_then_indents_child() {
        let note = Note::new("root").with_child("sub");

        let output = PasteGenerator::new().generate(&note).unwrap();

        assert_eq!(output, "%%tana%%\n- root\n  - sub\n");
    }

    #[test]
    fn given_tags_and_fields_when_generating_then_renders_inline_tags_and_field_lines() {
        let note = Note::new("Buy milk")
            .with_tags(["errand", "weekly shop", "to-do"])
            .with_fields(["priority:high", "store: corner: north"]);

        let output = PasteGenerator::new().generate(&note).unwrap();

        assert_eq!(
            output,
            "%%tana%%\n\
             - Buy milk #errand #[[weekly shop]] #[[to-do]]\n  \
             - priority:: high\n  \
             - store:: corner: north\n"
        );
    }

    #[test]
    fn given_nested_notes_when_generating_then_fields_precede_children() {
        let note = Note::new("Project")
            .with_child("loose line")
            .with_child(
                Note::new("Task")
                    .with_tags(["task"])
                    .with_fields(["status:open"])
                    .with_child(""),
            )
            .with_fields(["owner:me"]);

        let output = PasteGenerator::new().generate(&note).unwrap();

        let expected = [
            "%%tana%%",
            "- Project",
            "  - owner:: me",
            "  - loose line",
            "  - Task #task",
            "    - status:: open",
            "    - ",
            "",
        ]
        .join("\n");
        assert_eq!(output, expected);
    }

    #[test]
    fn given_same_note_when_generating_twice_then_output_is_identical() {
        let note = Note::new("Stable")
            .with_tags(["b", "a"])
            .with_child(Note::new("x").with_child("y"));
        let generator = PasteGenerator::new();

        assert_eq!(generator.generate(&note), generator.generate(&note));
    }

    #[test]
    fn given_empty_root_content_when_generating_then_returns_render_error() {
        let result = PasteGenerator::new().generate(&Note::new(""));

        assert!(matches!(result, Err(DomainError::Render(_))));
    }

    #[test]
    fn given_tree_deeper_than_limit_when_generating_then_returns_render_error() {
        let generator = PasteGenerator::new().with_max_depth(3);

        assert!(generator.generate(&nested(3)).is_ok());
        assert!(matches!(
            generator.generate(&nested(4)),
            Err(DomainError::Render(_))
        ));
    }

    #[test]
    fn given_tree_past_default_limit_when_generating_then_fails_without_overflow() {
        let result = PasteGenerator::new().generate(&nested(MAX_RENDER_DEPTH + 1));

        assert!(matches!(result, Err(DomainError::Render(_))));
    }

    #[test]
    fn given_several_notes_when_generating_many_then_joins_documents() {
        let notes = vec![Note::new("one"), Note::new("two").with_tags(["idea"])];

        let output = PasteGenerator::new().generate_many(&notes).unwrap();

        assert_eq!(output, "%%tana%%\n- one\n\n%%tana%%\n- two #idea\n");
    }

    #[test]
    fn given_template_when_applying_then_renders_paste() {
        let data = HashMap::from([("status".to_string(), "open".to_string())]);

        let output = PasteGenerator::new()
            .render_template("Write docs", "task", &data)
            .unwrap();

        assert_eq!(output, "%%tana%%\n- Write docs #task\n  - status:: open\n");
    }
}

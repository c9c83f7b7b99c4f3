//! Line-oriented source text buffer.

const INDENT: &str = "    ";

pub(super) struct SourceWriter {
    buffer: String,
    indent: usize,
}

impl SourceWriter {
    #[expect(
        clippy::missing_const_for_fn,
        reason = "avoid relying on const-stability details for allocation constructors"
    )]
    pub(super) fn new() -> Self {
        Self {
            buffer: String::new(),
            indent: 0,
        }
    }

    pub(super) const fn indent(&mut self) {
        self.indent += 1;
    }

    pub(super) const fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Writes `line` at the current indentation.
    pub(super) fn line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    /// Writes an empty line without trailing whitespace.
    pub(super) fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Opens a `{` block and indents its body.
    pub(super) fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.indent();
    }

    /// Closes the innermost block.
    pub(super) fn close(&mut self) {
        self.outdent();
        self.line("}");
    }

    pub(super) fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn blocks_indent_with_four_spaces() {
        let mut writer = SourceWriter::new();
        writer.open("class A");
        writer.line("val x = 1");
        writer.blank();
        writer.open("fun f()");
        writer.line("g()");
        writer.close();
        writer.close();
        assert_eq!(
            writer.finish(),
            "class A {\n    val x = 1\n\n    fun f() {\n        g()\n    }\n}\n"
        );
    }

    #[rstest]
    fn outdent_saturates_at_zero() {
        let mut writer = SourceWriter::new();
        writer.outdent();
        writer.line("top");
        assert_eq!(writer.finish(), "top\n");
    }
}

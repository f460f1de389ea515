use crate::registry::{ArgRegistry, ArgumentSpec};

/// Indentation used by [`ArgRegistry::render_help`].
pub const DEFAULT_INDENT: usize = 2;

fn format_keys(spec: &ArgumentSpec) -> String {
    let Some(canonical) = spec.canonical_trigger() else {
        return spec.name().to_string();
    };
    let mut out = canonical;
    for alias in spec.aliases() {
        out.push_str(", ");
        out.push_str(alias);
    }
    out
}

fn format_annotation(spec: &ArgumentSpec) -> String {
    match spec.default_value() {
        Some(value) => format!("[default: '{value}']"),
        None => "[required]".to_string(),
    }
}

fn format_help(spec: &ArgumentSpec) -> String {
    spec.help().unwrap_or_default().trim().to_string()
}

/// Pad every column to the widest cell in that column.
fn render_rows(out: &mut String, indent: &str, rows: &[Vec<String>]) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in rows {
        let mut line = String::from(indent);
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn render_section(out: &mut String, indent: &str, header: &str, rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(header);
    out.push('\n');
    render_rows(out, indent, rows);
}

impl ArgRegistry {
    /// Render usage text with the default indentation.
    pub fn render_help(&self) -> String {
        self.render_help_with_indent(DEFAULT_INDENT)
    }

    /// Render usage text, indenting the description and argument rows by
    /// `indent` spaces.
    ///
    /// The output only depends on the registry's declarations:
    ///
    /// ```text
    /// usage: resize [options] <input>
    ///
    /// positional arguments:
    ///   input [required] Image to resize
    ///
    /// flags:
    ///   --verbose, -v Chatty output
    /// ```
    pub fn render_help_with_indent(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);

        let mut out = format!("usage: {}", self.program());
        if self.flags().next().is_some() || self.options().next().is_some() {
            out.push_str(" [options]");
        }
        for spec in self.positionals() {
            if spec.is_required() {
                out.push_str(&format!(" <{}>", spec.name()));
            } else {
                out.push_str(&format!(" [{}]", spec.name()));
            }
        }
        out.push('\n');

        if let Some(description) = self.description() {
            out.push('\n');
            for line in description.trim_end().lines() {
                out.push_str(format!("{pad}{line}").trim_end());
                out.push('\n');
            }
        }

        let positionals: Vec<Vec<String>> = self
            .positionals()
            .map(|s| vec![format_keys(s), format_annotation(s), format_help(s)])
            .collect();
        let flags: Vec<Vec<String>> = self
            .flags()
            .map(|s| vec![format_keys(s), format_help(s)])
            .collect();
        let options: Vec<Vec<String>> = self
            .options()
            .map(|s| vec![format_keys(s), format_annotation(s), format_help(s)])
            .collect();

        render_section(&mut out, &pad, "positional arguments:", &positionals);
        render_section(&mut out, &pad, "flags:", &flags);
        render_section(&mut out, &pad, "options:", &options);

        out
    }
}

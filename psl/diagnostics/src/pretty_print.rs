use crate::Span;
use colored::{ColoredString, Colorize};

/// The colour scheme of a diagnostic severity.
pub(crate) trait DiagnosticColorer {
    fn title(&self) -> &'static str;

    fn primary_color(&self, token: &'_ str) -> ColoredString;
}

pub(crate) struct DatamodelErrorColorer;

impl DiagnosticColorer for DatamodelErrorColorer {
    fn title(&self) -> &'static str {
        "error"
    }

    fn primary_color(&self, token: &'_ str) -> ColoredString {
        token.bright_red()
    }
}

pub(crate) struct DatamodelWarningColorer;

impl DiagnosticColorer for DatamodelWarningColorer {
    fn title(&self) -> &'static str {
        "warning"
    }

    fn primary_color(&self, token: &'_ str) -> ColoredString {
        token.bright_yellow()
    }
}

/// Given the schema text, renders a message with its location and the
/// offending line:
///
/// ```text
/// error: Error validating model "A": ...
///   -->  schema.prisma:3
///    |
///  2 |
///  3 |   id Int @id
///    |   ^^^^^^^^^^
/// ```
///
/// Spans pointing past the end of the text (in-memory schemas built without
/// source) only print the title and location.
pub(crate) fn pretty_print(
    f: &mut dyn std::io::Write,
    file_name: &str,
    text: &str,
    span: Span,
    description: &str,
    colorer: &dyn DiagnosticColorer,
) -> std::io::Result<()> {
    writeln!(
        f,
        "{}{}",
        colorer.primary_color(colorer.title()).bold(),
        format!(": {description}").bold()
    )?;

    if span.start > text.len() || span.end > text.len() || span.start > span.end {
        return writeln!(f, "  {}  {}", "-->".bold().bright_blue(), file_name.underline());
    }

    let start_line_number = text[..span.start].matches('\n').count();
    let end_line_number = text[..span.end].matches('\n').count();
    let file_lines = text.split('\n').collect::<Vec<&str>>();

    let chars_in_line_before: usize = file_lines[..start_line_number].iter().map(|l| l.len()).sum();
    // Don't forget to count all the line breaks.
    let chars_in_line_before = chars_in_line_before + start_line_number;

    let line = &file_lines[start_line_number];

    let start_in_line = span.start - chars_in_line_before;
    let end_in_line = std::cmp::min(start_in_line + (span.end - span.start), line.len());

    let prefix = &line[..start_in_line];
    let offending = colorer.primary_color(&line[start_in_line..end_in_line]).bold();
    let suffix = &line[end_in_line..];

    let arrow = "-->".bold().bright_blue();
    let file_path = format!("{}:{}", file_name, start_line_number + 1).underline();

    writeln!(f, "  {arrow}  {file_path}")?;
    writeln!(f, "{}", format_line_number(0))?;

    writeln!(f, "{}", format_line_number_with_line(start_line_number, &file_lines))?;
    writeln!(f, "{}{}{}{}", format_line_number(start_line_number + 1), prefix, offending, suffix)?;

    if start_in_line == end_in_line {
        let spacing = " ".repeat(start_in_line);
        writeln!(
            f,
            "{} {}{}",
            format_line_number(0),
            spacing,
            colorer.primary_color("^ Unexpected token.").bold()
        )?;
    }

    for line_number in start_line_number + 2..end_line_number + 2 {
        writeln!(f, "{}", format_line_number_with_line(line_number, &file_lines))?;
    }

    writeln!(f, "{}", format_line_number(0))
}

fn format_line_number_with_line(line_number: usize, lines: &[&str]) -> ColoredString {
    if line_number > 0 && line_number <= lines.len() {
        colored::ColoredString::from(format!("{}{}", format_line_number(line_number), lines[line_number - 1]).as_str())
    } else {
        format_line_number(line_number)
    }
}

fn format_line_number(line_number: usize) -> ColoredString {
    if line_number > 0 {
        format!("{line_number:2} | ").bold().bright_blue()
    } else {
        "   |".bold().bright_blue()
    }
}

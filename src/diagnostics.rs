use crate::location::Location;

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};

use std::io;
use std::ops::Range;

pub type Diagnostic = Report<'static, (String, Range<usize>)>;

/// Builds a single-label error report pointing at `location`.
pub fn report_at(
    file: &str,
    source: &str,
    location: Location,
    code: &str,
    message: impl ToString,
    label: impl ToString,
    note: Option<String>,
) -> Diagnostic {
    let span = location.span_in(source);
    let mut report = Report::build(ReportKind::Error, (file.to_string(), span.clone()))
        .with_code(code)
        .with_message(message)
        .with_label(
            Label::new((file.to_string(), span))
                .with_message(label)
                .with_color(ColorGenerator::new().next()),
        );
    if let Some(note) = note {
        report = report.with_note(note);
    }
    report.finish()
}

pub fn eprint(report: &Diagnostic, file: &str, source: &str) -> io::Result<()> {
    report.eprint((file.to_string(), Source::from(source.to_string())))
}

pub fn write_to(report: &Diagnostic, file: &str, source: &str, out: impl io::Write) -> io::Result<()> {
    report.write((file.to_string(), Source::from(source.to_string())), out)
}

/// Renders a report into a string instead of a terminal stream.
pub fn render(report: &Diagnostic, file: &str, source: &str) -> io::Result<String> {
    let mut buf = Vec::new();
    write_to(report, file, source, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

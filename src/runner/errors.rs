use owo_colors::{OwoColorize, Stream};

use classy::errors::{Diagnostic, DiagnosticMessage, Level};
use classy::position::Position;
use classy::source::Source;

fn level_tag(level: Level) -> String {
    let tag = match level {
        Level::Fatal => "FATAL",
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
    };

    let styled = tag.if_supports_color(Stream::Stderr, |text| match level {
        Level::Fatal => text.red().to_string(),
        Level::Error => text.bright_red().to_string(),
        Level::Warn => text.yellow().to_string(),
        Level::Info => text.bright_cyan().to_string(),
    });

    styled.to_string()
}

/// The offending line followed by a caret under the column, indented by two spaces.
fn excerpt(src: &Source<'_>, pos: &Position) -> Option<String> {
    let line = src.get(pos.src?)?.line(pos.line)?;
    let padding = " ".repeat(pos.col.saturating_sub(1));
    let caret = "^".if_supports_color(Stream::Stderr, |text| text.bright_red());

    Some(format!("  {}\n  {}{}", line, padding, caret))
}

pub fn print_diagnostic(src: &Source<'_>, diagnostic: &Diagnostic) {
    let Diagnostic {
        level,
        message: DiagnosticMessage { pos, message },
        source: _,
    } = diagnostic;

    let tag = level_tag(*level);

    let Some(pos) = pos else {
        eprintln!("{} {}", tag, message);

        return;
    };

    eprintln!("{} {} {}", tag, pos.display(src), message);

    if let Some(excerpt) = excerpt(src, pos) {
        eprintln!("{}", excerpt);
    }
}

//! User-facing messages on stderr, coloured when stderr is a terminal
use std::fmt::Display;
use std::io::{self, Write};

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    tty::IsTty,
    QueueableCommand,
};

pub fn error(message: impl Display) {
    emit(Color::Red, "error", &message);
}

pub fn warning(message: impl Display) {
    emit(Color::Yellow, "warning", &message);
}

fn emit(color: Color, label: &str, message: &dyn Display) {
    let mut stderr = io::stderr();
    let styled = stderr.is_tty();
    if write_line(&mut stderr, styled, color, label, message).is_err() {
        eprintln!("{label}: {message}");
    }
}

fn write_line<W: Write>(
    writer: &mut W,
    styled: bool,
    color: Color,
    label: &str,
    message: &dyn Display,
) -> io::Result<()> {
    if styled {
        writer
            .queue(SetForegroundColor(color))?
            .queue(Print(label))?
            .queue(ResetColor)?;
    } else {
        write!(writer, "{label}")?;
    }
    writeln!(writer, ": {message}")?;
    writer.flush()
}

use ansi_term::{Colour, Style};
use std::fmt;

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_LATER: &str = "🌙";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn bold(colour: Colour) -> Style {
    colour.bold()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", bold(Colour::Blue).paint(ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", bold(Colour::Green).paint(ICON_OK), msg);
}

/// Something that will happen at the nightly cutover.
pub fn scheduled<T: fmt::Display>(msg: T) {
    println!("{} {}", bold(Colour::Cyan).paint(ICON_LATER), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", bold(Colour::Yellow).paint(ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", bold(Colour::Red).paint(ICON_ERR), msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}", bold(Colour::Blue).paint(format!("====================== {}\n", msg)));
}

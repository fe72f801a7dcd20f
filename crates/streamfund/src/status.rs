//! Prefixed status lines on stderr, keeping stdout free for reports

use colored::*;

const PREFIX_WIDTH: usize = 8;

fn format_prefix(color: Color, label: &str) -> String {
  let padding = PREFIX_WIDTH.saturating_sub(label.len() + 2);
  format!("[{}]{}", label.color(color).bold(), " ".repeat(padding))
}

fn emit(color: Color, label: &str, message: &str) {
  let prefix = format_prefix(color, label);
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn info(message: &str) {
  emit(Color::Blue, "info", message);
}

pub fn warn(message: &str) {
  emit(Color::Yellow, "warn", message);
}

pub fn error(message: &str) {
  emit(Color::Red, "error", message);
}

pub fn done(message: &str) {
  emit(Color::Green, "done", message);
}

use std::io::{self, BufRead, Write};
use colored::*;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {

    fn tag(&self) -> ColoredString {
        match self {
            Level::Debug => "DEBUG".truecolor(110, 110, 220),
            Level::Info  => "INFO".green(),
            Level::Warn  => "WARN".truecolor(255, 130, 0),
            Level::Error => "ERROR".truecolor(255, 20, 0),
        }
    }

}

/// Colored console log, warnings and errors go to stderr.
pub struct Logger {}

impl Logger {

    fn format(level: Level, label: &str, content: Option<&str>) -> String {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        let content = match content {
            Some(content) => format!("{}: {}", label.truecolor(140, 140, 140), content),
            None          => label.to_string()
        };
        format!("{} [{}] {}", time.dimmed(), level.tag(), content)
    }

    fn log(level: Level, label: &str, content: Option<&str>) {
        let line = Logger::format(level, label, content);
        match level {
            Level::Debug | Level::Info => println!("{}", line),
            Level::Warn  | Level::Error => eprintln!("{}", line),
        }
    }

    /// Only printed with the `debug` feature.
    #[allow(unused)]
    pub fn debug(label: &str, content: &str) {
        if cfg!(feature = "debug") {
            Logger::log(Level::Debug, label, Some(content));
        }
    }

    #[allow(unused)]
    pub fn warn(label: &str) {
        Logger::log(Level::Warn, label, None);
    }

    pub fn err(label: &str) {
        Logger::log(Level::Error, label, None);
    }

    pub fn info_long(label: &str, content: &str) {
        Logger::log(Level::Info, label, Some(content));
    }

    pub fn warn_long(label: &str, content: &str) {
        Logger::log(Level::Warn, label, Some(content));
    }

    pub fn err_long(label: &str, content: &str) {
        Logger::log(Level::Error, label, Some(content));
    }

    /// Prompts on stdout and reads one trimmed line, `None` once stdin is closed.
    #[allow(unused)]
    pub fn input(label: &str) -> Option<String> {
        print!("{}", Logger::format(Level::Info, label, Some("")));
        let _ = io::stdout().flush();
        Logger::read_input(&mut io::stdin().lock())
    }

    fn read_input(reader: &mut impl BufRead) -> Option<String> {
        let mut input = String::new();
        match reader.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input.trim().to_string()),
            Err(err) => {
                Logger::err_long("Failed to read input", &err.to_string());
                None
            }
        }
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn lines_carry_label_and_content() {
        colored::control::set_override(false);
        let line = Logger::format(Level::Warn, "Failed to mute", Some("Missing Access"));
        assert!(line.ends_with("[WARN] Failed to mute: Missing Access"));
        assert!(Logger::format(Level::Info, "Ready", None).ends_with("[INFO] Ready"));
    }

    #[test]
    fn input_ends_with_the_stream() {
        let mut stdin = io::Cursor::new("ls\n\n  get token \n");
        assert_eq!(Logger::read_input(&mut stdin).as_deref(), Some("ls"));
        assert_eq!(Logger::read_input(&mut stdin).as_deref(), Some(""));
        assert_eq!(Logger::read_input(&mut stdin).as_deref(), Some("get token"));
        assert_eq!(Logger::read_input(&mut stdin), None);
        assert_eq!(Logger::read_input(&mut stdin), None);
    }

}

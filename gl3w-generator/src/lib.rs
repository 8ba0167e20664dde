use std::sync::LazyLock;

use regex::Regex;

pub mod c;
pub mod rust;

pub use c::{emit_header, emit_source};
pub use rust::emit_rust_procs;

/// prefix shared by every gl entry point (`glGetError`).
const COMMAND_PREFIX_LEN: usize = 2;

/// prefix of the pointer variables that replace them (`gl3wGetError`).
pub const POINTER_PREFIX: &str = "gl3w";

// NOTE: this only understands declarations that fit on one line, which is what glcorearb.h does.
// a wrapped declaration is silently skipped.
static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^GLAPI.*APIENTRY\s+(\w+)").expect("invalid declaration regex"));

/// a single entry point of the api.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Command<'a> {
    pub name: &'a str,
}

impl<'a> Command<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// `glGetError` -> `GetError`
    fn unprefixed(&self) -> &'a str {
        let start = self
            .name
            .char_indices()
            .nth(COMMAND_PREFIX_LEN)
            .map_or(self.name.len(), |(i, _)| i);
        &self.name[start..]
    }

    /// `glGetError` -> `gl3wGetError`
    pub fn pointer_name(&self) -> String {
        format!("{POINTER_PREFIX}{}", self.unprefixed())
    }

    /// `glGetError` -> `PFNGLGETERRORPROC`
    pub fn pointer_type(&self) -> String {
        format!("PFN{}PROC", self.name.to_uppercase())
    }
}

/// collects every core profile entry point declared in the header, sorted by name.
pub fn parse_commands(header: &str) -> Vec<Command<'_>> {
    let mut commands: Vec<Command> = header
        .lines()
        .filter_map(|line| DECLARATION.captures(line))
        .filter_map(|captures| captures.get(1))
        .map(|name| Command::new(name.as_str()))
        .collect();
    commands.sort_unstable();
    commands.dedup();
    log::debug!("found {} commands", commands.len());
    commands
}

use std::io;

use crate::Command;

/// the entry point `gl3w::Loader` queries the context version with.
const VERSION_QUERY: &str = "glGetIntegerv";

const PREAMBLE: &str = "// generated by gl3w-gen, do not edit.

#[allow(non_snake_case)]
#[derive(Default)]
pub struct Procs {
";

/// writes a `gl3w::ProcTable` implementation with one slot per command, named after the command
/// itself. meant to be `include!`d.
///
/// NOTE: the header only yields names, not signatures, so slots are untyped `gl3w::Proc`s. unlike
/// the `#define` aliases on the c side, a slot has to be transmuted to the real fn type before it
/// can be called.
pub fn emit_rust_procs<W: io::Write>(w: &mut W, commands: &[Command]) -> anyhow::Result<()> {
    w.write_all(PREAMBLE.as_bytes())?;
    for cmd in commands.iter() {
        write!(w, "    pub {}: Option<gl3w::Proc>,\n", cmd.name)?;
    }
    write!(w, "}}\n\n")?;

    write!(w, "impl gl3w::ProcTable for Procs {{\n")?;
    if commands.is_empty() {
        write!(
            w,
            "    fn load_with(&mut self, _resolve: &mut dyn FnMut(&std::ffi::CStr) -> Option<gl3w::Proc>) {{\n"
        )?;
    } else {
        write!(
            w,
            "    fn load_with(&mut self, resolve: &mut dyn FnMut(&std::ffi::CStr) -> Option<gl3w::Proc>) {{\n"
        )?;
    }
    for cmd in commands.iter() {
        write!(w, "        self.{0} = resolve(c\"{0}\");\n", cmd.name)?;
    }
    write!(w, "    }}\n\n")?;

    write!(w, "    fn version_query(&self) -> Option<gl3w::Proc> {{\n")?;
    if commands.iter().any(|cmd| cmd.name == VERSION_QUERY) {
        write!(w, "        self.{VERSION_QUERY}\n")?;
    } else {
        write!(w, "        None\n")?;
    }
    write!(w, "    }}\n")?;
    write!(w, "}}\n")?;
    Ok(())
}

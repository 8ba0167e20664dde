// generated by gl3w-gen, do not edit.

#[allow(non_snake_case)]
#[derive(Default)]
pub struct Procs {
    pub glGetError: Option<gl3w::Proc>,
    pub glGetIntegerv: Option<gl3w::Proc>,
}

impl gl3w::ProcTable for Procs {
    fn load_with(&mut self, resolve: &mut dyn FnMut(&std::ffi::CStr) -> Option<gl3w::Proc>) {
        self.glGetError = resolve(c"glGetError");
        self.glGetIntegerv = resolve(c"glGetIntegerv");
    }

    fn version_query(&self) -> Option<gl3w::Proc> {
        self.glGetIntegerv
    }
}

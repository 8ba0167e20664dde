// generated by gl3w-gen, do not edit.

#[allow(non_snake_case)]
#[derive(Default)]
pub struct Procs {
}

impl gl3w::ProcTable for Procs {
    fn load_with(&mut self, _resolve: &mut dyn FnMut(&std::ffi::CStr) -> Option<gl3w::Proc>) {
    }

    fn version_query(&self) -> Option<gl3w::Proc> {
        None
    }
}

pub mod compile_spec;
pub mod gen_skeleton;

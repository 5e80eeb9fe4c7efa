pub mod difficulty;
pub mod float_ext;
pub mod hint;
pub mod map_or_attrs;
pub mod root_finding;
pub mod special_functions;

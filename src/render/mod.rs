pub mod backend;
pub mod context;
pub mod cpu;
pub mod primitives;
pub mod recording;
pub mod text;

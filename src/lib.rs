pub mod select_core;

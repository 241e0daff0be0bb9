pub mod config;
mod main_lib;

pub use main_lib::{
    build_pipeline_config, build_sinks, build_source, exit_code_for, init_tracing, run,
    EXIT_CONFIG, EXIT_NO_DATA,
};

pub mod formatter;

pub use formatter::{
    display_name, format_composite, format_json, format_ranked_table, format_tsv,
    should_use_colors, OutputFormat,
};

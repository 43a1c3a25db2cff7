pub mod table;
pub mod writer_csv;
pub mod writer_jsonl;

pub use table::{print_report, render_table};
pub use writer_csv::write_csv;
pub use writer_jsonl::{read_jsonl, write_jsonl};

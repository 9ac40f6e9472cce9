mod csv_file;

pub(crate) use csv_file::{
    default_export_path, expand_home, export, import, ImportOutcome, ImportedExpense,
};

pub mod diagnostics;
pub mod metadata;
pub mod output;
pub mod row;
pub mod settings;

pub use diagnostics::{Checkpoint, Diagnostics, PivotWarning};
pub use metadata::{DomainMap, ValueDomain, VariableLabelMap};
pub use output::OutputFormat;
pub use row::{
    OUTPUT_COLUMNS_AFTER_ATTRIBUTES, PivotedRow, PivotedTable, SURVEY_NAME_COLUMN, YEAR_COLUMN,
};
pub use settings::PivotSettings;

pub mod csv_io;
pub mod input;
pub mod roster;
pub mod store;

pub use csv_io::{export_csv, import_csv, load_rows_csv, CsvError};
pub use input::{coerce_amount, coerce_count, sanitize_amount, sanitize_count, MAX_EMPLOYEE_COUNT};
pub use roster::{EmployeeRow, OutletState, RowInput};
pub use store::{SessionMeta, StateStore, StoreError};

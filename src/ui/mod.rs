/// Widgets for the catalog screen
///
/// - Toolbar, table and pagination (table.rs)
/// - Edit/create forms and the modal overlay (dialog.rs)

pub mod dialog;
pub mod table;

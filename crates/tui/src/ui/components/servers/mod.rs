mod create_component;
mod details_component;
mod form;
mod form_view;
mod state;
mod table_component;

pub use create_component::ServerCreateComponent;
pub use details_component::ServerDetailsComponent;
pub use form::{FormField, ServerFormState};
pub use state::{DeleteState, ServerDetailState, ServersState, ServersTableState};
pub use table_component::ServersTableComponent;

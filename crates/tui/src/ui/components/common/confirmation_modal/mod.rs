mod confirmation_modal_component;
mod state;

pub use confirmation_modal_component::ConfirmationModal;
pub use state::{ConfirmationButton, ConfirmationModalOpts, ConfirmationModalState};

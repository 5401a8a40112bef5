mod confirm_modal;
mod spinner;

pub use confirm_modal::ConfirmModal;
pub use spinner::LoadingSpinner as Spinner;

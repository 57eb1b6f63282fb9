pub mod layout;
pub mod modal;
pub mod profile;
pub mod toast;

pub use layout::{fill_template, load_template, render_page, NavLink};
pub use modal::{ModalEvent, ProfileEditor, ServiceEditor, SubmitError};
pub use toast::{flash, take_flashed, ToastKind, ToastNotifier};

/// Injected UI: control buttons on watch pages and toast notifications
pub mod components;
pub mod controls;
pub mod toast;

pub use components::ToastKind;
pub use controls::{insert_controls, start_controls, stop_controls};
pub use toast::show_toast;

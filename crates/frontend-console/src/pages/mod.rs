mod controller;
mod login;
mod logout;
mod main_view;
mod sorry;

pub use controller::ControllerView;
pub use login::LoginPage;
pub use logout::LogoutPage;
pub use main_view::MainPage;
pub use sorry::SorryPage;

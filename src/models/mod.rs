mod lenient;
mod user;
mod service;
mod order;
mod forms;

pub use user::{Role, User};
pub use service::Service;
pub use order::Order;
pub use forms::{
    DeleteForm, LoginForm, LoginRequest, ProfileForm, RegisterForm, RegisterRequest,
    ServiceForm,
};

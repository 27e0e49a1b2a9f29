pub mod quote;
pub mod validator;

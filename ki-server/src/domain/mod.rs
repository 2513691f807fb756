pub(crate) mod account;
pub(crate) mod error;
pub(crate) mod membership;
pub(crate) mod model_state;
pub(crate) mod post;
pub(crate) mod user;

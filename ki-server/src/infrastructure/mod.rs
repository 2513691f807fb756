pub(crate) mod database;
pub(crate) mod forms_auth;
pub(crate) mod jwt;
pub(crate) mod logging;
pub(crate) mod password;
pub(crate) mod settings;

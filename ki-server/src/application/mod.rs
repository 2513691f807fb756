pub(crate) mod account_controller;
pub(crate) mod forms_auth;
pub(crate) mod membership_service;
pub(crate) mod post_service;

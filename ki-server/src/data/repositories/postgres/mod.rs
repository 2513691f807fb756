pub(crate) mod membership_provider;
pub(crate) mod post_repository;

pub mod config;
pub mod errors;
pub mod jobs;
pub mod onboarding;
pub mod routes;
pub mod state;
pub mod upstream;

#[cfg(test)]
pub(crate) mod test_support;

mod admin_tests;
mod auth_tests;
mod public_tests;

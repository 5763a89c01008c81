pub mod test_auth;

pub mod fakes;
pub mod test_context;

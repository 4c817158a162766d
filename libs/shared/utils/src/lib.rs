pub mod gate;
pub mod test_utils;

pub mod logging;
pub mod paste;
#[cfg(test)]
pub mod test_utils;

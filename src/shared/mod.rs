pub mod deserialize;

#[cfg(test)]
pub mod test_helpers;
